//! Downloadable example workbook.
//!
//! Built in memory with rust_xlsxwriter so the template always matches the
//! reader: three headered sheets plus a headerless `Parameters` sheet.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::SampleError;
use crate::models::{MODELS_SHEET, PARAMETERS_SHEET, PROMPTS_SHEET, VALUES_SHEET};

pub const SAMPLE_FILE_NAME: &str = "example.xlsx";
pub const SAMPLE_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Rows the sample produces: 5 value fills × 2 models × 4 parameter sets.
pub const SAMPLE_ROW_COUNT: usize = 40;

#[derive(Clone, Copy)]
enum SampleValue {
    Text(&'static str),
    Number(f64),
    Blank,
}

use SampleValue::{Blank, Number, Text};

const PROMPTS_HEADER: &[&str] = &["prompt_id", "template"];
const PROMPTS: &[&[SampleValue]] = &[
    &[Text("p1"), Text("Hi {{name}}")],
    &[Text("p2"), Text("Summarize the following {{topic}} article in {{length}} words.")],
    &[Text("p3"), Text("Translate '{{text}}' into {{language}}.")],
];

const VALUES_HEADER: &[&str] = &["prompt_id", "name", "topic", "length", "text", "language"];
const VALUES: &[&[SampleValue]] = &[
    &[Text("p1"), Text("Alice"), Blank, Blank, Blank, Blank],
    &[Text("p1"), Text("Bob"), Blank, Blank, Blank, Blank],
    &[Text("p2"), Blank, Text("science"), Number(100.0), Blank, Blank],
    &[Text("p3"), Blank, Blank, Blank, Text("Good morning"), Text("French")],
    &[Text("p3"), Blank, Blank, Blank, Text("Thank you"), Text("Spanish")],
];

const MODELS_HEADER: &[&str] = &["Name", "Version"];
const MODELS: &[&[SampleValue]] = &[&[Text("gpt"), Number(4.0)], &[Text("claude"), Text("3.5")]];

const PARAMETERS: &[&[SampleValue]] = &[&[Text("temperature"), Text("0,1")], &[Text("max_tokens"), Text("256,512")]];

/// Build the example workbook as `.xlsx` bytes.
pub fn sample_workbook() -> Result<Vec<u8>, SampleError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    write_sheet(&mut workbook, PROMPTS_SHEET, Some(PROMPTS_HEADER), PROMPTS, &header_format)?;
    write_sheet(&mut workbook, VALUES_SHEET, Some(VALUES_HEADER), VALUES, &header_format)?;
    write_sheet(&mut workbook, MODELS_SHEET, Some(MODELS_HEADER), MODELS, &header_format)?;
    write_sheet(&mut workbook, PARAMETERS_SHEET, None, PARAMETERS, &header_format)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    header: Option<&[&str]>,
    rows: &[&[SampleValue]],
    header_format: &Format,
) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;

    let mut row_idx: u32 = 0;
    if let Some(header) = header {
        for (col, title) in header.iter().enumerate() {
            sheet.write_string_with_format(row_idx, col as u16, *title, header_format)?;
        }
        row_idx += 1;
    }

    for row in rows {
        for (col, value) in row.iter().enumerate() {
            match *value {
                Text(s) => {
                    sheet.write_string(row_idx, col as u16, s)?;
                }
                Number(n) => {
                    sheet.write_number(row_idx, col as u16, n)?;
                }
                Blank => {}
            }
        }
        row_idx += 1;
    }

    sheet.autofit();
    Ok(())
}
