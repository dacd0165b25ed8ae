mod courses;
mod fields;

pub use courses::{CourseSample, CourseStats, course_list};
pub use fields::{extract, extract_text, extract_value, value_text};
