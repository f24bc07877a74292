use schema::{CreatureDefinition, ItemDefinition, QuestTemplate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Compiles the RON catalogs under `data/` into postcard-encoded `phf` maps.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;
    let dest = Path::new(&out_dir).join("generated_data.rs");

    let elites: Vec<CreatureDefinition> = load_ron("data/elites.ron")?;
    let items: Vec<ItemDefinition> = load_ron("data/items.ron")?;
    let quests: Vec<QuestTemplate> = load_ron("data/quests.ron")?;

    validate_evolution_links(&elites, &items)?;

    let mut generated = String::new();
    generated.push_str("// @generated by build.rs from data/*.ron. Do not edit.\n\n");
    emit_catalog(
        &mut generated,
        "ELITE",
        elites.iter().map(|e| (e.id.as_str(), e)),
    )?;
    emit_catalog(&mut generated, "ITEM", items.iter().map(|i| (i.id.as_str(), i)))?;
    emit_catalog(&mut generated, "QUEST", quests.iter().map(|q| (q.id.as_str(), q)))?;

    fs::write(dest, generated)?;

    println!("cargo:rerun-if-changed=data/elites.ron");
    println!("cargo:rerun-if-changed=data/items.ron");
    println!("cargo:rerun-if-changed=data/quests.ron");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}

fn load_ron<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path, e))?;
    let entries = ron::from_str(&text).map_err(|e| format!("parsing {}: {}", path, e))?;
    Ok(entries)
}

/// Emits `<PREFIX>_DATA` (id -> encoded bytes) and `<PREFIX>_ORDER` (ids in file order).
fn emit_catalog<'a, T: Serialize + 'a>(
    out: &mut String,
    prefix: &str,
    entries: impl Iterator<Item = (&'a str, &'a T)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ids = Vec::new();
    let mut encoded = Vec::new();
    for (id, entry) in entries {
        if ids.contains(&id) {
            return Err(format!("duplicate {} id '{}'", prefix.to_lowercase(), id).into());
        }
        let bytes = schema::encode(entry)?;
        let literal = format!(
            "&[{}]",
            bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
        );
        ids.push(id);
        encoded.push(literal);
    }

    let mut map = phf_codegen::Map::new();
    for (id, literal) in ids.iter().zip(&encoded) {
        map.entry(*id, literal);
    }

    writeln!(
        out,
        "pub static {}_DATA: phf::Map<&'static str, &'static [u8]> = {};\n",
        prefix,
        map.build()
    )?;
    writeln!(
        out,
        "pub static {}_ORDER: &[&str] = &[{}];\n",
        prefix,
        ids.iter()
            .map(|id| format!("{:?}", id))
            .collect::<Vec<_>>()
            .join(", ")
    )?;
    Ok(())
}

fn validate_evolution_links(
    elites: &[CreatureDefinition],
    items: &[ItemDefinition],
) -> Result<(), Box<dyn std::error::Error>> {
    for elite in elites {
        let Some(evolution) = &elite.evolution else {
            continue;
        };
        if !elites.iter().any(|e| e.id == evolution.evolves_into) {
            return Err(format!(
                "{} evolves into unknown species '{}'",
                elite.id, evolution.evolves_into
            )
            .into());
        }
        if let schema::EvolutionMethod::Item(item_id) = &evolution.method {
            if !items.iter().any(|i| &i.id == item_id) {
                return Err(format!("{} evolves with unknown item '{}'", elite.id, item_id).into());
            }
        }
    }
    Ok(())
}
