//! Static categorized vocabulary and secret-word selection.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCategory {
    pub name: &'static str,
    pub words: &'static [&'static str],
}

/// The secret word of a round and the category it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPick {
    pub word: String,
    pub category: String,
}

pub static CATEGORIES: &[WordCategory] = &[
    WordCategory {
        name: "Viaggi & Luoghi",
        words: &[
            "Passaporto", "Valigia", "Aereo", "Mappa", "Bussola", "Spiaggia", "Hotel", "Treno",
            "Biglietto", "Souvenir", "Aeroporto", "Binario", "Crociera", "Montagna", "Campeggio",
        ],
    },
    WordCategory {
        name: "Epoche Storiche",
        words: &[
            "Piramide", "Castello", "Spada", "Corona", "Cavaliere", "Pergamena", "Mummia",
            "Colosseo", "Trono", "Bandiera", "Armatura", "Vichingo", "Faraone", "Gladiatore",
        ],
    },
    WordCategory {
        name: "Mondi Fantasy",
        words: &[
            "Drago", "Bacchetta", "Pozione", "Elfo", "Orco", "Tesoro", "Unicorno", "Mantello",
            "Cristallo", "Strega", "Fantasma", "Incantesimo", "Goblin", "Sirena",
        ],
    },
    WordCategory {
        name: "Lavori & Professioni",
        words: &[
            "Dottore", "Martello", "Pompiere", "Computer", "Microfono", "Camice", "Lavagna",
            "Casco", "Bisturi", "Divisa", "Avvocato", "Poliziotto", "Cuoco", "Muratore",
        ],
    },
    WordCategory {
        name: "Cibo & Ristoranti",
        words: &[
            "Pizza", "Sushi", "Pasta", "Gelato", "Hamburger", "Forchetta", "Pentola",
            "Cioccolato", "Coltello", "Caffè", "Ristorante", "Menu", "Bicchiere", "Tovagliolo",
        ],
    },
    WordCategory {
        name: "Sport & Hobby",
        words: &[
            "Pallone", "Racchetta", "Piscina", "Medaglia", "Arbitro", "Porta", "Tifoso",
            "Fischietto", "Palestra", "Sci", "Calcio", "Tennis", "Nuoto", "Basket",
        ],
    },
    WordCategory {
        name: "Film & Media",
        words: &[
            "Televisione", "Cinema", "Popcorn", "Telecomando", "Cuffie", "Fotocamera", "Radio",
            "Giornale", "Internet", "Videogioco", "Attore", "Regista", "Schermo", "Notizia",
        ],
    },
    WordCategory {
        name: "Vita Quotidiana",
        words: &[
            "Divano", "Letto", "Lampada", "Chiave", "Specchio", "Frigorifero", "Cuscino",
            "Doccia", "Finestra", "Orologio", "Telefono", "Tavolo", "Sedia", "Armadio",
        ],
    },
    WordCategory {
        name: "Natura & Animali",
        words: &[
            "Albero", "Fiore", "Montagna", "Fiume", "Leone", "Sole", "Pioggia", "Fungo",
            "Farfalla", "Vulcano", "Cane", "Gatto", "Uccello", "Nuvola",
        ],
    },
    WordCategory {
        name: "Scienza & Tech",
        words: &[
            "Smartphone", "Robot", "Batteria", "Cavo", "Tablet", "Satellite", "Drone", "Router",
            "Tastiera", "Mouse", "Razzo", "Microscopio", "Laboratorio", "Codice",
        ],
    },
    WordCategory {
        name: "Scuola & Studio",
        words: &[
            "Penna", "Quaderno", "Zaino", "Righello", "Gomma", "Libro", "Cattedra", "Compasso",
            "Astuccio", "Banco", "Esame", "Laurea", "Matita", "Lavagna",
        ],
    },
];

static CATEGORY_INDEX: Lazy<BTreeMap<&'static str, &'static WordCategory>> =
    Lazy::new(|| CATEGORIES.iter().map(|c| (c.name, c)).collect());

/// All category names, in display order.
pub fn category_names() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|c| c.name)
}

pub fn find_category(name: &str) -> Option<&'static WordCategory> {
    CATEGORY_INDEX.get(name).copied()
}

/// Every selectable (word, category) pair for `categories`.
///
/// Categories are visited in display order; a word listed twice keeps its
/// first category. Unknown names contribute nothing.
fn candidate_pool(categories: &BTreeSet<String>) -> Vec<(&'static str, &'static str)> {
    let mut seen = HashSet::new();
    CATEGORIES
        .iter()
        .filter(|c| categories.contains(c.name))
        .flat_map(|c| c.words.iter().map(move |w| (*w, c.name)))
        .filter(|(word, _)| seen.insert(*word))
        .collect()
}

/// Number of distinct words `categories` can produce.
pub fn pool_size(categories: &BTreeSet<String>) -> usize {
    candidate_pool(categories).len()
}

/// Draw the secret word for a round.
///
/// Words in `used_words` are skipped while anything else remains; once the
/// selection is exhausted repeats are allowed again. An empty selection is a
/// configuration error that settings validation should have caught.
pub fn select_word<R: Rng + ?Sized>(
    categories: &BTreeSet<String>,
    used_words: &BTreeSet<String>,
    rng: &mut R,
) -> Result<WordPick, DomainError> {
    let pool = candidate_pool(categories);
    if pool.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyWordPool,
            "selected categories contain no words",
        ));
    }

    let fresh: Vec<_> = pool
        .iter()
        .filter(|(word, _)| !used_words.contains(*word))
        .copied()
        .collect();

    let source = if fresh.is_empty() {
        debug!(pool = pool.len(), "Word pool exhausted; allowing repeats");
        pool
    } else {
        fresh
    };

    let (word, category) = source[rng.random_range(0..source.len())];
    Ok(WordPick {
        word: word.to_string(),
        category: category.to_string(),
    })
}
