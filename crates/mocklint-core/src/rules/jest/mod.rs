//! Rules for code written against the Jest testing framework

pub mod prefer_mocked;

pub use prefer_mocked::PreferMocked;
