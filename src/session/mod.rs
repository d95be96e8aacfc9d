//! Session state and the controller that mutates it.

mod controller;
mod state;

pub use controller::{
    Intent, PendingEdit, SessionController, CANCELLED_MESSAGE, READ_FAILURE_MESSAGE,
    TRANSFORM_FAILURE_MESSAGE, VALIDATION_MESSAGE,
};
pub use state::{Phase, SessionState};
