//! # Placard CLI
//!
//! Usage:
//!   placard input.json -o label.pdf
//!   echo '{ ... }' | placard -o label.pdf
//!   placard --a4 packing.json -o packing.pdf
//!   placard --example > input.json

use std::env;
use std::fs;
use std::io::{self, Read};

use placard::LayoutTemplate;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_label_json());
        return;
    }

    let template = if args.iter().any(|a| a == "--a4") {
        LayoutTemplate::a4_document()
    } else {
        LayoutTemplate::six_by_four_compact()
    };

    // Read input: the first bare argument that is not the -o value,
    // falling back to stdin.
    let input_path = (1..args.len())
        .find(|&i| !args[i].starts_with('-') && args[i - 1] != "-o")
        .map(|i| args[i].clone());
    let input = match input_path {
        Some(path) => fs::read_to_string(&path).expect("Failed to read input file"),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .expect("Failed to read stdin");
            buf
        }
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "label.pdf".to_string());

    // Render
    match placard::render_json(&input, &template) {
        Ok(pdf_bytes) => {
            fs::write(&output_path, &pdf_bytes).expect("Failed to write PDF");
            eprintln!("✓ Written {} bytes to {}", pdf_bytes.len(), output_path);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn example_label_json() -> &'static str {
    r##"{
  "container_label": {
    "ship_from": {
      "name": "XYZ COMPANY",
      "address": "345 SOUTH STREET\nPLYMOUTH, MI 48170",
      "supplierCode": "S-00417",
      "countryOfOrigin": "US"
    },
    "ship_to": {
      "name": "ACME ASSEMBLY",
      "address": "100 PLANT PARKWAY\nDETROIT, MI 48201",
      "plant": "4100",
      "storageLocation": "RM-02"
    },
    "partNumber": "PT00001234-A",
    "partDescription": "FOG LAMP FR FASCIA, RR",
    "quantity": "1000",
    "unitOfMeasure": "EA",
    "poNumber": "5500000001",
    "poLineNumber": "00010",
    "lotNumber": "123456789012345",
    "productionDate": "2022-10-22",
    "expirationDate": "2023-11-26",
    "lpn_1j": "1J5124509271900001",
    "qr_code": { "encoded_string": "QR_DATA" },
    "qml": "Q1",
    "pcd": "2022-10-23"
  }
}"##
}
