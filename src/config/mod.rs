//! Configuration module

mod site;

pub use site::AboutConfig;
pub use site::FormFieldsConfig;
pub use site::FormsConfig;
pub use site::SiteConfig;
pub use site::SliderConfig;
