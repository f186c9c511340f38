mod review;

pub use self::review::*;
