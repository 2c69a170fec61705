mod event;
mod event_reader;

pub use event_reader::EvdevDevice;
