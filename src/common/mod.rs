// Helpers shared by the JSON and CSV paths

pub mod coerce;
