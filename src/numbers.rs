//! Cardinal number spelling (English).
//!
//! Uses the British convention of an "and" before the final part below one
//! hundred: 105 is "one hundred and five", 2024 is "two thousand and
//! twenty-four". Groups are separated by spaces only, never commas.

const ONES: &[&str] = &[
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: &[&str] = &[
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: &[&str] = &[
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spell out an unsigned integer.
pub fn to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    // Thousands groups, least significant first.
    let mut groups = Vec::with_capacity(SCALES.len());
    let mut remaining = n;
    while remaining > 0 {
        groups.push(remaining % 1000);
        remaining /= 1000;
    }

    let mut words: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        if scale == 0 && group < 100 && !words.is_empty() {
            words.push("and".to_string());
        }
        words.push(hundreds(group));
        if scale > 0 {
            words.push(SCALES[scale].to_string());
        }
    }

    words.join(" ")
}

/// Spell out a digit string, falling back to digit-by-digit reading when it
/// does not fit in a `u64`.
pub fn digits_to_words(digits: &str) -> String {
    match digits.parse::<u64>() {
        Ok(n) => to_words(n),
        Err(_) => digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| ONES[d as usize])
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// 1..=999
fn hundreds(n: u64) -> String {
    let h = n / 100;
    let rest = n % 100;
    match (h, rest) {
        (0, _) => tens(rest),
        (_, 0) => format!("{} hundred", ONES[h as usize]),
        _ => format!("{} hundred and {}", ONES[h as usize], tens(rest)),
    }
}

/// 1..=99
fn tens(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let ten = (n / 10) as usize;
    let one = (n % 10) as usize;
    if one == 0 {
        TENS[ten].to_string()
    } else {
        format!("{}-{}", TENS[ten], ONES[one])
    }
}
