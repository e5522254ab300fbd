pub mod timesheet;

pub use timesheet::{Action, Period, Person, TimesheetEntry, Worklogs};
