use crate::error::VocabularyError;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const DEFAULT_PRODUCTS: &[&str] = &[
    "MARTILLO DE UÑA",
    "MANGUERA DE JARDÍN",
    "MANIJA",
    "DESARMADOR PLANO",
    "DESARMADOR DE CRUZ",
    "PINZA DE PRESIÓN",
    "PINZA DE CORTE",
    "LLAVE INGLESA",
    "LLAVE ALLEN",
    "CINTA MÉTRICA",
    "CINTA AISLANTE",
    "TORNILLO PARA MADERA",
    "TORNILLO AUTORROSCANTE",
    "TAQUETE DE PLÁSTICO",
    "CLAVO DE ACERO",
    "BROCA PARA CONCRETO",
    "BROCA PARA METAL",
    "LIJA PARA AGUA",
    "PINTURA VINÍLICA",
    "BROCHA",
    "RODILLO",
    "SILICÓN TRANSPARENTE",
    "PEGAMENTO BLANCO",
    "CANDADO",
    "CADENA",
    "CABLE CALIBRE 12",
    "CONTACTO DOBLE",
    "APAGADOR SENCILLO",
    "FOCO LED",
    "TUBO PVC",
    "CODO PVC",
    "LLAVE DE PASO",
    "CARRETILLA",
    "PALA",
    "PICO",
    "SERRUCHO",
    "NIVEL DE BURBUJA",
    "ESCALERA DE ALUMINIO",
];

pub fn default_products() -> Vec<String> {
    DEFAULT_PRODUCTS.iter().map(|s| s.to_string()).collect()
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<String>, VocabularyError> {
    let path = path.as_ref();
    let words = load_from_reader(BufReader::new(File::open(path)?))?;
    info!("loaded {} products from {}", words.len(), path.display());
    Ok(words)
}

/// One product per line; blank lines and `#` comments are skipped.
pub fn load_from_reader<R: BufRead>(reader: R) -> Result<Vec<String>, VocabularyError> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        words.push(line.to_string());
    }
    Ok(words)
}
