/// Format whole currency units with thousands separators: 15,000원
pub fn won(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if amount < 0 {
        format!("-{with_commas}원")
    } else {
        format!("{with_commas}원")
    }
}
