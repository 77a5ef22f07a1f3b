mod image_payload;
mod product;
mod user;

pub use image_payload::*;
pub use product::*;
pub use user::*;
