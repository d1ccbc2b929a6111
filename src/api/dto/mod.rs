//! Request/response DTOs for the typed endpoint surface.

pub mod auth_dto;
pub mod merchant_dto;
pub mod order_dto;
pub mod recipe_dto;
pub mod user_dto;

pub use auth_dto::{LoginRequest, LoginResponse, RegisterRequest, SmsCodeRequest};
pub use merchant_dto::{MenuDish, MerchantSummary};
pub use order_dto::OrderSummary;
pub use recipe_dto::Recipe;
pub use user_dto::{UserProfile, UserUpdate};
