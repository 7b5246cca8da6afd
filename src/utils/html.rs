// src/utils/html.rs

/// Strips markup that could execute in a browser from admin-supplied quiz text.
/// Safe inline tags survive; `<script>` is removed with its content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes and trims a required text field.
pub fn clean_text(input: &str) -> String {
    clean_html(input.trim()).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::clean_text;

    #[test]
    fn removes_scripts_and_keeps_text() {
        assert_eq!(clean_text("  Safety <script>alert(1)</script>Quiz "), "Safety Quiz");
        assert_eq!(clean_text("<b>Bold</b>"), "<b>Bold</b>");
    }
}
