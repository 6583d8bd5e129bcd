//! The `quizdeck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizdeck.toml
    if std::path::Path::new("quizdeck.toml").exists() {
        println!("quizdeck.toml already exists, skipping.");
    } else {
        std::fs::write("quizdeck.toml", SAMPLE_CONFIG)?;
        println!("Created quizdeck.toml");
    }

    // Create example bank
    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.csv");
    if example_path.exists() {
        println!("banks/example.csv already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.csv");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizdeck.toml to set a time limit or question count");
    println!("  2. Run: quizdeck validate --bank banks/example.csv");
    println!("  3. Run: quizdeck take --bank banks/example.csv");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdeck configuration

# Questions drawn at random per session (0 = whole bank, in order)
random_count = 0

# Time limit in minutes (0 = untimed)
time_limit_minutes = 10

# Where unfinished sessions are saved
state_dir = "./.quizdeck"

# Where reports are written after submission
output_dir = "./quizdeck-results"

# Report formats: json, html, or all
default_format = "json,html"
"#;

const EXAMPLE_BANK: &str = "\u{feff}問題,選項A,選項B,選項C,選項D,正確答案
台灣最高的山是哪一座？,玉山,雪山,合歡山,阿里山,A
一年有幾個月？,10,11,12,13,C
水的化學式是什麼？,CO2,H2O,O2,NaCl,B
下列何者是哺乳類？,鯊魚,企鵝,鯨魚,鱷魚,C
光速大約是每秒多少公里？,三千,三萬,三十萬,三百萬,C
";
