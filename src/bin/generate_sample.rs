use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (64-bit LCG) so the sample catalog is
/// reproducible across runs.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 11
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() as usize) % items.len()]
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let themes = [
        ("Air Quality", "environment"),
        ("Coastal Water Temperature", "oceans"),
        ("Seismic Events", "geology"),
        ("Crop Yield Survey", "agriculture"),
        ("Urban Traffic Counts", "transport"),
        ("Hospital Admissions", "health"),
        ("Wind Farm Output", "energy"),
        ("River Gauge Levels", "hydrology"),
    ];
    let publishers = ["NOAA", "USGS", "EPA", "ESA", "Eurostat"];
    let licenses = ["CC0", "CC-BY-4.0", "ODbL"];
    let units = ["kb", "mb", "gb"];

    let mut titles: Vec<Option<String>> = Vec::new();
    let mut dates: Vec<Option<String>> = Vec::new();
    let mut sizes: Vec<Option<String>> = Vec::new();
    let mut publisher_col: Vec<Option<String>> = Vec::new();
    let mut license_col: Vec<Option<String>> = Vec::new();
    let mut theme_col: Vec<Option<String>> = Vec::new();

    for (i, (title, theme)) in themes.iter().enumerate() {
        // Three yearly editions per theme, so name sorts have date tie-breaks.
        for year in [2022, 2023, 2024] {
            let month = 1 + (rng.next_u64() % 12) as u32;
            let day = 1 + (rng.next_u64() % 28) as u32;
            let whole = 1 + (rng.next_u64() % 900);
            let tenth = rng.next_u64() % 10;
            let unit = rng.pick(&units);

            titles.push(Some(title.to_string()));
            dates.push(Some(format!("{year}-{month:02}-{day:02}")));
            sizes.push(Some(format!("{whole}.{tenth}{unit}")));
            publisher_col.push(Some(rng.pick(&publishers).to_string()));
            license_col.push(Some(rng.pick(&licenses).to_string()));
            theme_col.push(Some(theme.to_string()));
        }

        // Every other theme also gets a sparse legacy row: missing date,
        // unit-less or malformed size. Exercises the normalization paths.
        if i % 2 == 0 {
            titles.push(Some(format!("{title} (archive)")));
            dates.push(None);
            sizes.push(Some(if i % 4 == 0 {
                "123456".to_string()
            } else {
                "unknown".to_string()
            }));
            publisher_col.push(Some(rng.pick(&publishers).to_string()));
            license_col.push(None);
            theme_col.push(Some(theme.to_string()));
        }
    }
    let n_rows = titles.len();

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, true),
        Field::new("datePublished", DataType::Utf8, true),
        Field::new("size", DataType::Utf8, true),
        Field::new("publisher", DataType::Utf8, true),
        Field::new("license", DataType::Utf8, true),
        Field::new("theme", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(dates)),
            Arc::new(StringArray::from(sizes)),
            Arc::new(StringArray::from(publisher_col)),
            Arc::new(StringArray::from(license_col)),
            Arc::new(StringArray::from(theme_col)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let output_path = "sample_catalog.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} dataset records to {output_path}");
}
