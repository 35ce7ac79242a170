/// Levenshtein distance between two strings, case-insensitive.
///
/// Classic three-operation model (substitution, insertion, deletion), each at
/// unit cost, over a `(len(b)+1) x (len(a)+1)` DP table of `char`s.
pub fn distance(a: &str, b: &str) -> usize {
    let s1: Vec<char> = a.to_lowercase().chars().collect();
    let s2: Vec<char> = b.to_lowercase().chars().collect();

    let mut matrix = vec![vec![0usize; s1.len() + 1]; s2.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=s2.len() {
        for j in 1..=s1.len() {
            matrix[i][j] = if s2[i - 1] == s1[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                let substitution = matrix[i - 1][j - 1];
                let insertion = matrix[i][j - 1];
                let deletion = matrix[i - 1][j];
                substitution.min(insertion).min(deletion) + 1
            };
        }
    }

    matrix[s2.len()][s1.len()]
}

/// Similarity score in percent, rounded to two decimals:
/// `(1 - distance / max_len) * 100`.
///
/// Two empty strings score 100.00 by convention; the naive formula would
/// divide by zero there.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }
    let d = distance(a, b);
    round2((1.0 - d as f64 / max_len as f64) * 100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
