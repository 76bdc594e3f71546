use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;

pub fn log_msg(level: &str, msg: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open("finsage-tour.log")
    {
        let now: DateTime<Local> = Local::now();
        let _ = writeln!(
            file,
            "time=\"{time}\" level={level} msg=\"{msg}\"",
            time = now.format("%Y-%m-%dT%H:%M:%S%z"),
        );
    }
}
