/// Turn a menu answer into a zero-based endpoint index. The menu is 1-based;
/// `0`, out-of-range numbers and non-numeric input are all rejected.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    if n >= 1 && n <= count {
        Some(n - 1)
    } else {
        None
    }
}
