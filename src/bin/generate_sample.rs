use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated record: region, product, units, price, on_sale.
#[derive(Clone, Copy)]
struct Row {
    region: &'static str,
    product: &'static str,
    units: Option<i64>,
    price: Option<f64>,
    on_sale: bool,
}

const REGIONS: &[&str] = &["North", "South", "East", "West"];
const PRODUCTS: &[&str] = &["Widget", "Gadget", "Doohickey"];
const HEADERS: [&str; 5] = ["region", "product", "units", "price", "on_sale"];

fn generate_rows(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    let mut rows: Vec<Row> = (0..n)
        .map(|_| {
            let units = (rng.next_f64() > 0.1).then(|| 1 + (rng.next_u64() % 50) as i64);
            let price =
                (rng.next_f64() > 0.15).then(|| (rng.next_f64() * 10_000.0).round() / 100.0);
            Row {
                region: rng.pick(REGIONS),
                product: rng.pick(PRODUCTS),
                units,
                price,
                on_sale: rng.next_f64() > 0.7,
            }
        })
        .collect();

    // Exact copies of a few earlier rows for the duplicate remover.
    for i in (0..n).step_by(7) {
        rows.push(rows[i]);
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record([
            row.region.to_string(),
            row.product.to_string(),
            row.units.map(|u| u.to_string()).unwrap_or_default(),
            row.price.map(|p| p.to_string()).unwrap_or_default(),
            if row.on_sale { "True" } else { "False" }.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_xlsx(path: &Path, rows: &[Row]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        for (c, header) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, c as u16, *header, &bold)?;
        }
        for (r, row) in rows.iter().enumerate() {
            let r = r as u32 + 1;
            sheet.write_string(r, 0, row.region)?;
            sheet.write_string(r, 1, row.product)?;
            if let Some(units) = row.units {
                sheet.write_number(r, 2, units as f64)?;
            }
            if let Some(price) = row.price {
                sheet.write_number(r, 3, price)?;
            }
            sheet.write_boolean(r, 4, row.on_sale)?;
        }
    }
    workbook.save(path).context("saving workbook")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 40);

    let csv_path = out_dir.join("sample.csv");
    write_csv(&csv_path, &rows)?;
    let xlsx_path = out_dir.join("sample.xlsx");
    write_xlsx(&xlsx_path, &rows)?;

    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        xlsx_path.display()
    );
    Ok(())
}
