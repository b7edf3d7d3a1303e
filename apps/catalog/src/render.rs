//! Plain-text rendering of the catalog lists.

use std::fmt::Write as _;

use shared::domain::{Category, Course};

pub fn category_title(category: Category) -> &'static str {
    match category {
        Category::Beginner => "Beginners",
        Category::Advanced => "Advanced",
    }
}

pub fn render_course(course: &Course) -> String {
    let released = course
        .released_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unreleased".to_string());
    format!(
        "#{seq:<3} [{id}] {description} ({released})",
        seq = course.seq_no,
        id = course.id,
        description = course.description,
    )
}

pub fn render_list(category: Category, courses: &[Course]) -> String {
    let mut out = format!("{} ({})\n", category_title(category), courses.len());
    if courses.is_empty() {
        out.push_str("  no courses\n");
    }
    for course in courses {
        let _ = writeln!(out, "  {}", render_course(course));
    }
    out
}
