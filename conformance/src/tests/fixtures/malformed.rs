//! Documents the Turtle parser must reject.

/// Uses `owl:` without declaring it.
pub const MISSING_PREFIX: &str = r#"@prefix : <http://example.org/highway_code#> .

:Agent a owl:Class .
"#;

/// The last statement has no terminating `.`.
pub const UNTERMINATED_STATEMENT: &str = r#"@prefix :    <http://example.org/highway_code#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .

:Agent a owl:Class .
:Ego a owl:Class ;
  <http://www.w3.org/2000/01/rdf-schema#subClassOf> :Agent
"#;
