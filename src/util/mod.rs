pub mod request_id;
pub mod subscribe;

pub use request_id::next_request_id;
pub use subscribe::Unsubscribe;
