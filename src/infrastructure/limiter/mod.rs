pub mod login_throttle;

pub use login_throttle::LoginThrottle;
