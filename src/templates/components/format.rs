/// "$1,234,567" with no cents; "-" when missing.
pub fn fmt_money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(v.round() as i64)),
        None => "-".to_string(),
    }
}

/// Whole numbers print without decimals; "-" when missing.
pub fn fmt_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => group_thousands(v as i64),
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

/// Like `fmt_number` but without grouping, for years and codes.
pub fn fmt_plain(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

pub fn fmt_score(value: f64) -> String {
    format!("{value:.3}")
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}
