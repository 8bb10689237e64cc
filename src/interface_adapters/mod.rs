// Interface adapters: terminal frame, input parsing and the outcome report format.

pub mod display;
pub mod frame;
pub mod input;
pub mod protocol;

pub use display::frame_flush_task;
pub use frame::FrameBuffer;
pub use input::{CommandParseError, PlayerCommand, command_reader_task, parse_line};
pub use protocol::OutcomeReportDto;
