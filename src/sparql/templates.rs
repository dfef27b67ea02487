//! Query texts sent to the Wikidata query service.
//!
//! `P6782` is Wikidata's "ROR ID" property; it links an item to the ROR
//! record describing the same organization.

/// Counts, per predicate, the triples whose subject and object both carry a
/// ROR ID. Ordered by count, descending.
pub const PREDICATE_CENSUS: &str = "\
SELECT DISTINCT ?predicate (COUNT(?predicate) as ?count)
WHERE {
  ?subjectROR ^wdt:P6782 ?subject .
  ?subject ?predicate ?object .
  ?object wdt:P6782 ?objectROR .
  SERVICE wikibase:label { bd:serviceParam wikibase:language \"[AUTO_LANGUAGE],mul,en\". }
}
GROUP BY ?predicate
ORDER BY DESC(?count)
";

/// Fetches the preferred-language label of every given property in one query.
pub fn predicate_labels<S: AsRef<str>>(predicates: &[S]) -> String {
    let values = predicates
        .iter()
        .map(|p| format!("wd:{}", p.as_ref()))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "SELECT ?predicate ?predicateLabel
WHERE {{
  VALUES ?predicate {{ {values} }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"[AUTO_LANGUAGE],mul,en\". }}
}}
"
    )
}

/// Retrieves every (subject ROR ID, object ROR ID) pair whose items are
/// connected by `predicate`.
pub fn ror_relations(predicate: &str) -> String {
    format!(
        "SELECT ?subjectROR ?objectROR
WHERE {{ ?subjectROR ^wdt:P6782/wdt:{predicate}/wdt:P6782 ?objectROR . }}
ORDER BY ?subjectROR ?objectROR
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn census_groups_by_predicate() {
        assert!(PREDICATE_CENSUS.contains("GROUP BY ?predicate"));
        assert!(PREDICATE_CENSUS.contains("ORDER BY DESC(?count)"));
    }

    #[test]
    fn label_query_embeds_values_clause() {
        let query = predicate_labels(&["P361", "P749"]);
        assert!(query.contains("VALUES ?predicate { wd:P361 wd:P749 }"));
        assert!(query.contains("SERVICE wikibase:label"));
    }

    #[test]
    fn relation_query_uses_property_path() {
        let query = ror_relations("P749");
        assert_eq!(
            query,
            "SELECT ?subjectROR ?objectROR\n\
             WHERE { ?subjectROR ^wdt:P6782/wdt:P749/wdt:P6782 ?objectROR . }\n\
             ORDER BY ?subjectROR ?objectROR\n"
        );
    }
}
