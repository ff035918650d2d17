pub mod application;
pub mod assets;
pub mod contact;
pub mod form;
pub mod i18n;
pub mod page;
pub mod rich_text;
pub mod sender;
pub mod site;
pub mod text_edit;

pub use application::ContactApplication;
pub use contact::{ContactController, ContactError, ContactForm, ContactOptions, ContactSnapshot};
pub use page::ContactPage;
pub use site::SiteProfile;
