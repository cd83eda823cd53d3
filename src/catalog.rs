use std::{fs, path::Path};

use tracing::info;

use crate::{error::{IndexError, Result}, vectorizer::corpus::Document};

/// Reference catalog: `(title, description)` pairs.
pub const REFERENCE_MOVIES: &[(&str, &str)] = &[
    ("Mission Impossible", "action drama thriller suspense friendship"),
    ("Ghosted", "action drama romance adventure"),
    ("Dishoom", "action drama adventure friendship"),
    ("Abhay", "action thriller crimes secrets"),
    ("Inception", "sci-fi thriller mystery action mind-bending"),
    ("The Dark Knight", "action drama superhero crime intense"),
    ("Titanic", "romance drama tragedy historical emotional"),
    ("Interstellar", "sci-fi space drama adventure emotional"),
    ("Jumanji", "adventure comedy action fantasy friendship"),
    ("Avengers: Endgame", "action superhero sci-fi drama emotional"),
    ("The Matrix", "sci-fi action thriller cyberpunk futuristic"),
    ("John Wick", "action thriller revenge assassin stylish"),
    ("The Notebook", "romance drama emotional love story"),
    ("The Conjuring", "horror thriller supernatural suspense scary"),
    ("Parasite", "thriller drama mystery satire social"),
    ("The Godfather", "crime drama classic family mafia"),
    ("The Shawshank Redemption", "drama prison friendship hope inspirational"),
    ("Forrest Gump", "drama comedy emotional romance inspirational"),
    ("Black Panther", "action superhero drama african-heritage cultural"),
    ("Frozen", "animation musical fantasy friendship family"),
    ("The Lion King", "animation drama musical animals coming-of-age"),
    ("Shrek", "animation comedy fantasy adventure friendship"),
    ("Finding Nemo", "animation adventure family underwater emotional"),
    ("Gladiator", "action drama historical revenge epic"),
    ("The Revenant", "adventure drama survival revenge action"),
    ("Spider-Man: No Way Home", "superhero action drama multiverse emotional"),
    ("The Pursuit of Happyness", "biography drama emotional inspirational family"),
    ("La La Land", "romance musical drama dreams sacrifice"),
    ("Joker", "drama thriller psychological crime disturbing"),
    ("Tenet", "sci-fi action thriller mind-bending time-travel"),
    ("No Time to Die", "action thriller spy drama emotional"),
    ("Mad Max: Fury Road", "action adventure dystopian sci-fi intense"),
    ("Dangal", "sports drama biography inspirational family"),
    ("3 Idiots", "comedy drama friendship education inspirational"),
    ("PK", "comedy drama sci-fi satire social"),
    ("Drishyam", "thriller crime drama family suspense"),
    ("Andhadhun", "thriller comedy crime twist musical"),
    ("RRR", "action drama friendship historical patriotic"),
    ("Pathaan", "action spy drama patriotism thriller"),
    ("Bajrangi Bhaijaan", "drama emotional comedy patriotism humanity"),
    ("Kantara", "drama mythological action folklore mystery"),
    ("K.G.F: Chapter 1", "action drama crime rise power gritty"),
    ("War", "action thriller spy betrayal twists"),
    ("Don", "action crime drama thriller mafia"),
    ("Barfi!", "romance comedy drama emotional heartwarming"),
    ("Zindagi Na Milegi Dobara", "drama friendship adventure self-discovery"),
    ("Queen", "comedy drama self-discovery empowerment travel"),
    ("Tumbbad", "horror thriller fantasy mythology greed"),
    ("The Lunchbox", "romance drama emotional slice-of-life subtle"),
    ("Swades", "drama emotional patriotism inspirational rural"),
];

/// The reference catalog as documents, catalog order
pub fn reference_corpus() -> Vec<Document> {
    REFERENCE_MOVIES
        .iter()
        .map(|&(title, description)| Document::new(title, description))
        .collect()
}

/// Parse a JSON corpus: `[{"title": "...", "description": "..."}, ...]`
pub fn parse_json(text: &str) -> Result<Vec<Document>> {
    let documents: Vec<Document> = serde_json::from_str(text)?;
    if documents.is_empty() {
        return Err(IndexError::InvalidArgument("corpus file holds no documents".to_string()));
    }
    Ok(documents)
}

/// Read and parse a JSON corpus file
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let documents = parse_json(&text)?;
    info!(path = %path.display(), doc_num = documents.len(), "loaded corpus file");
    Ok(documents)
}
