use std::io::Read;

/// Header row and data rows of a roster sheet, cells trimmed.
#[derive(Debug)]
pub(crate) struct RosterSheet {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl RosterSheet {
    pub(crate) fn column(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers.iter().position(|candidate| candidate == wanted)
    }
}

pub(crate) fn parse_sheet<R: Read>(reader: R) -> Result<RosterSheet, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let headers = match records.next() {
        Some(record) => record?
            .iter()
            .enumerate()
            .map(|(index, cell)| header_label(index, cell))
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let row: Vec<String> = record?.iter().map(clean_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }

    Ok(RosterSheet { headers, rows })
}

/// Blank header cells get a positional label so every column stays addressable.
fn header_label(index: usize, cell: &str) -> String {
    let cleaned = clean_cell(cell);
    if cleaned.is_empty() {
        format!("Column {}", index + 1)
    } else {
        cleaned
    }
}

fn clean_cell(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}
