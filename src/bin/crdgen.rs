//! # CRD Generator
//!
//! Prints the CustomResourceDefinitions of the provider as multi-document YAML.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > package/crds/github.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use kube::core::CustomResourceExt;
use provider_github::crd::{Membership, ProviderConfig, ProviderConfigUsage, Team};

fn main() {
    let crds = [
        ProviderConfig::crd(),
        ProviderConfigUsage::crd(),
        Team::crd(),
        Membership::crd(),
    ];

    println!("# This file is auto-generated by crdgen");
    println!("# DO NOT EDIT THIS FILE MANUALLY");
    for crd in &crds {
        match serde_yaml::to_string(crd) {
            Ok(yaml) => {
                println!("---");
                print!("{yaml}");
            }
            Err(e) => {
                eprintln!("Failed to serialize CRD to YAML: {e}");
                std::process::exit(1);
            }
        }
    }
}
