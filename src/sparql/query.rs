//! SPARQL text for one page of a category.

/// Builds the page query for instances of `entity` (e.g. `wd:Q783794`).
///
/// `p:P856/ps:P856` walks every official-website statement regardless of rank,
/// so an entity with several sites yields one binding per site. Results are
/// ordered by `?item` so that `LIMIT`/`OFFSET` slice a stable sequence.
pub fn build_query(entity: &str, limit: usize, offset: usize) -> String {
    format!(
        "SELECT ?item ?itemLabel ?website WHERE {{
  ?item wdt:P31 {entity} .
  ?item p:P856/ps:P856 ?website .
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"en\". }}
}}
ORDER BY ?item
LIMIT {limit}
OFFSET {offset}
"
    )
}
