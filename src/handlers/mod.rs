mod auth;
mod health;
mod pages;

pub use auth::{current_session, register, sign_in, sign_out, ErrorResponse};
pub use health::health_check;
pub use pages::{
    assistant_dashboard, dentist_dashboard, index, messages, patient_home, sign_in_page,
};
