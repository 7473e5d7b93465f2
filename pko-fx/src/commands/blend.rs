//! Blend code lookup

use anyhow::Result;
use pko_effect::BlendFactor;

use crate::utils::{Column, create_table};

pub fn execute(codes: &[i32]) -> Result<()> {
    let codes: Vec<i32> = if codes.is_empty() {
        BlendFactor::ALL.iter().map(|factor| factor.legacy_code()).collect()
    } else {
        codes.to_vec()
    };

    let mut table = create_table(&[
        Column::number("Code"),
        Column::text("Factor"),
        Column::number("GL constant"),
    ]);
    for code in codes {
        let factor = BlendFactor::from_legacy_code(code);
        let name = if (1..=11).contains(&code) {
            factor.name().to_string()
        } else {
            format!("{} (fallback)", factor.name())
        };
        table.add_row(vec![
            code.to_string(),
            name,
            format!("0x{:04X}", factor.gl_constant()),
        ]);
    }
    table.printstd();

    Ok(())
}
