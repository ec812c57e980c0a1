use num_bigint::BigInt;
use num_rational::BigRational;

use crate::Symbol;

pub fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

pub fn int(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

pub fn rat(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

pub fn linspace(start: f64, end: f64, num: usize) -> impl Iterator<Item = f64> {
    let step = if num > 1 {
        (end - start) / (num - 1) as f64
    } else {
        0.0
    };
    (0..num).map(move |i| start + i as f64 * step)
}

pub fn init_test_logger() {
    use std::io::Write as _;
    let _ = env_logger::builder()
        .is_test(true)
        .format(|buf, record| {
            // Ansi256 ref: https://hexdocs.pm/color_palette/ansi_color_codes.html
            let bg = anstyle::Ansi256Color(240);
            let level_style = buf
                .default_level_style(record.level())
                .bg_color(Some(bg.into()));
            let grey = anstyle::Ansi256Color(255).on(bg);

            let filepath = match record.file() {
                Some(f) => {
                    // Get just the file name, not the full path.
                    let path = std::path::Path::new(f);
                    match path.file_name() {
                        Some(name) => name.to_string_lossy(),
                        None => "unknown".into(),
                    }
                }
                None => "unknown".into(),
            };
            writeln!(
                buf,
                "{grey}[{grey:#}{level_style}{}{level_style:#}{grey} {}:{}]{grey:#}   {}",
                record.level(),
                filepath,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init();
}
