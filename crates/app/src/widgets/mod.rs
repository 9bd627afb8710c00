pub mod toast;

pub use toast::Toasts;
