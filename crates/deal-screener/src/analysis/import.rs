use super::listing::ListingSnapshot;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listing export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listing CSV data: {}", err),
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads catalog exports whose headers match the `ListingSnapshot` field names.
pub struct ListingImporter;

impl ListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ListingSnapshot>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ListingSnapshot>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut listings = Vec::new();
        for record in csv_reader.deserialize::<ListingSnapshot>() {
            listings.push(record?);
        }

        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "id,address,city,state,price,bedrooms,property_type,estimated_rent,estimated_arv,estimated_repair_cost,property_taxes,hoa_fees,days_on_market,listing_date";

    #[test]
    fn parses_rows_with_optional_columns_left_blank() {
        let csv = format!(
            "{HEADER}\n\
             cle-1,9012 Maple Ave,Cleveland,OH,75000,2,Single Family,1200,140000,20000,1800,0,67,2024-01-20\n\
             cle-2,14 Lake Rd,Cleveland,OH,98000,,,,,0,2100,0,,\n"
        );

        let listings = ListingImporter::from_reader(Cursor::new(csv)).expect("csv parses");

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].estimated_arv, Some(140000.0));
        assert_eq!(
            listings[0].listing_date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 20)
        );
        assert_eq!(listings[1].estimated_rent, None);
        assert_eq!(listings[1].estimated_arv, None);
        assert_eq!(listings[1].days_on_market, None);
    }

    #[test]
    fn reports_malformed_numbers() {
        let csv = format!(
            "{HEADER}\nbad-1,1 Main St,Memphis,TN,not-a-price,3,,1400,,0,0,0,,\n"
        );

        let err = ListingImporter::from_reader(Cursor::new(csv)).expect_err("price is invalid");

        assert!(matches!(err, ListingImportError::Csv(_)));
        assert!(err.to_string().contains("invalid listing CSV data"));
    }
}
