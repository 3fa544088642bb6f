//! Common data types used throughout the application

pub mod appointment;
pub mod calendar;
pub mod tools;

pub use appointment::{Appointment, AppointmentStatus};
pub use calendar::{
    AgentCalendarConfig, CalendarEvent, DayOfWeek, DaySchedule, EventStatus, SlotCheck, TimeOfDay,
    TimeSlot,
};
pub use tools::{ToolCall, ToolCallPayload, ToolReply};
