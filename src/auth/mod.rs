mod credentials;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod sign_up;
mod user;

pub use credentials::{get_password_hash, hash_registration, register, save_registration, verify};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use sign_up::{get_root_page, get_sign_up_page, post_sign_up};
pub use user::{User, UserID, create_user_table};
