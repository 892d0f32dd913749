//! A single rule with one predicate, its exceptional flag, and the lattice.

/// Valid document: one scenario, one rule, three compliance classes.
pub const MINIMAL_RULE: &str = r#"@prefix :     <http://example.org/highway_code#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .

<http://example.org/highway_code>
  a owl:Ontology ;
  rdfs:label "Highway Code" ;
  owl:versionInfo "0.1.0" .

:Agent
  a owl:Class ;
  rdfs:label "Agent" .

:Ego
  a owl:Class ;
  rdfs:label "ego" ;
  rdfs:subClassOf :Agent .

:EgoUnconditional
  a owl:Class ;
  rdfs:label "ego unconditionally" ;
  rdfs:subClassOf :Ego .

:stop
  a owl:DatatypeProperty , owl:FunctionalProperty ;
  rdfs:label "stop" ;
  rdfs:domain :EgoUnconditional ;
  rdfs:range xsd:boolean .

:EgoUnconditional_Stop
  a owl:Class ;
  rdfs:label "EgoUnconditional under Stop" ;
  rdfs:subClassOf :EgoUnconditional .

:exceptionalCircumstance_EgoUnconditional_Stop
  a owl:DatatypeProperty , owl:FunctionalProperty ;
  rdfs:label "exceptional circumstance applies (EgoUnconditional_Stop)" ;
  rdfs:domain :EgoUnconditional_Stop ;
  rdfs:range xsd:boolean .

:EgoUnconditional_Stop_Default
  a owl:Class ;
  rdfs:subClassOf :EgoUnconditional_Stop ;
  owl:equivalentClass [
    a owl:Class ;
    owl:intersectionOf (
      [ a owl:Restriction ; owl:onProperty :stop ; owl:hasValue "true"^^xsd:boolean ]
    )
  ] .

:EgoUnconditional_Stop_Mitigated
  a owl:Class ;
  rdfs:subClassOf :EgoUnconditional_Stop ;
  owl:disjointWith :EgoUnconditional_Stop_Default ;
  owl:equivalentClass [
    a owl:Class ;
    owl:intersectionOf (
      [
        a owl:Class ;
        owl:unionOf (
          [ a owl:Restriction ; owl:onProperty :stop ; owl:hasValue "false"^^xsd:boolean ]
        )
      ]
      [ a owl:Restriction ; owl:onProperty :exceptionalCircumstance_EgoUnconditional_Stop ; owl:hasValue "true"^^xsd:boolean ]
    )
  ] .
"#;
