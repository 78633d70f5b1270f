pub mod encoder;
pub mod queue;
pub mod storage;
