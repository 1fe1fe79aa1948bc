//! "Did you mean" suggestions based on edit distance

/// Default maximum distance (exclusive) for a suggestion
pub const DEFAULT_THRESHOLD: usize = 3;

/// Levenshtein distance between `a` and `b` (unit insert/delete/substitute costs)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // table[i][j] = distance between a[..i] and b[..j]
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        table[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = usize::from(a[i - 1] != b[j - 1]);
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + substitution);
        }
    }

    table[a.len()][b.len()]
}

/// Find the candidate closest to `input`, ignoring case.
///
/// Returns the candidate with the smallest distance strictly below
/// `threshold`; on ties the first candidate wins. Empty input never
/// produces a suggestion.
pub fn suggest<'a, I>(input: &str, candidates: I, threshold: usize) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if input.is_empty() {
        return None;
    }
    let input = input.to_lowercase();

    let mut best = None;
    let mut best_distance = threshold;
    for candidate in candidates {
        let distance = levenshtein(&input, &candidate.to_lowercase());
        if distance < best_distance {
            best_distance = distance;
            best = Some(candidate);
        }
    }
    best
}
