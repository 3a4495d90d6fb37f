//! Write a synthetic pair of cohort CSV files in the marks-sheet layout:
//! three banner rows, a header row, then
//! `RegNo, StudentName, Organization, Course, Guide, Marks`.
//!
//! A few rows carry blank or non-numeric marks so the cleaning step has
//! something to drop.

use std::path::Path;

use anyhow::{Context, Result};

const ORGANIZATIONS: [(&str, f64); 9] = [
    ("Infosys", 0.22),
    ("TCS", 0.18),
    ("Wipro", 0.14),
    ("Accenture", 0.12),
    ("Cognizant", 0.1),
    ("HCL", 0.08),
    ("Tech Mahindra", 0.07),
    ("Capgemini", 0.05),
    ("Zoho", 0.04),
];

const COURSES: [(&str, f64); 7] = [
    ("Python Full Stack", 0.25),
    ("Data Science", 0.2),
    ("AI & ML", 0.18),
    ("Java Full Stack", 0.14),
    ("Cloud Computing", 0.1),
    ("Cyber Security", 0.08),
    ("IoT", 0.05),
];

const FIRST_NAMES: [&str; 10] = [
    "Aswitha", "Komali", "Vaheeda", "Moditha", "Vani", "Ravi", "Kiran", "Sai", "Lakshmi", "Arjun",
];

/// SplitMix64: enough randomness for sample data, and reproducible across
/// platforms so every run writes the same files.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately normal marks: the sum of twelve uniforms has variance 1.
    fn marks(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = (0..12).map(|_| self.unit()).sum::<f64>() - 6.0;
        mean + std_dev * z
    }

    /// Pick from `(item, weight)` pairs; weights need not sum to one.
    fn weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut target = self.unit() * total;
        for (item, w) in items {
            if target < *w {
                return *item;
            }
            target -= *w;
        }
        items[items.len() - 1].0
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn write_cohort(path: &Path, prefix: &str, students: usize, mean: f64, rng: &mut SampleRng) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["Department of Artificial Intelligence"])?;
    writer.write_record([format!("Summer Internship Marks - Batch {prefix}")])?;
    writer.write_record(["Generated sample"])?;
    writer.write_record(["Reg No", "Student Name", "Organization", "Course", "Guide", "Marks"])?;

    for i in 0..students {
        let reg_no = format!("{prefix}AIT{:03}", 401 + i);
        let name = format!("{} {}", rng.pick(&FIRST_NAMES), (b'A' + (i % 26) as u8) as char);
        let org = rng.weighted(&ORGANIZATIONS);
        let course = rng.weighted(&COURSES);

        // Roughly one row in twenty is unusable.
        let marks = match rng.next_u64() % 20 {
            0 => String::new(),
            1 => "AB".to_string(),
            _ => format!("{:.0}", rng.marks(mean, 9.0).clamp(35.0, 100.0)),
        };

        writer.write_record([reg_no.as_str(), name.as_str(), org, course, "", marks.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);

    write_cohort(Path::new("sample_y21.csv"), "Y21", 180, 74.0, &mut rng)?;
    write_cohort(Path::new("sample_y22.csv"), "Y22", 220, 78.0, &mut rng)?;

    println!("Wrote sample_y21.csv and sample_y22.csv");
    println!("Open them with: internship-dashboard --csv sample_y21.csv --csv sample_y22.csv");
    Ok(())
}
