//! Turtle 1.1 serializer for compiled ontology fragments.
//!
//! Produces a Turtle document with the standard prefixes, an `owl:Ontology`
//! header, the deontic annotation properties, and then every symbol in the
//! order it was minted. Nothing here iterates a hash map, so identical input
//! always yields byte-identical output.

use std::fmt::Write as FmtWrite;

use crate::model::{
    annotation_properties, iris, ClassDescriptor, PropertyDescriptor, Provenance, RestrictionExpr,
    Symbol,
};

/// Document-level metadata written before the symbols.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    /// IRI bound to the empty prefix; every symbol name is a local name under it.
    pub base_iri: String,
    /// IRI of the `owl:Ontology` resource.
    pub ontology_iri: String,
    /// `rdfs:label` of the ontology.
    pub label: String,
    /// `owl:versionInfo` of the ontology.
    pub version: String,
}

/// Serializes `symbols` to a Turtle string.
#[must_use]
pub fn to_turtle(header: &DocumentHeader, symbols: &[Symbol]) -> String {
    let mut out = String::with_capacity(4 * 1024 + symbols.len() * 256);

    // Prefix declarations
    out.push_str(&format!("@prefix :     <{}> .\n", header.base_iri));
    out.push_str(&format!("@prefix owl:  <{}> .\n", iris::OWL));
    out.push_str(&format!("@prefix rdf:  <{}> .\n", iris::RDF));
    out.push_str(&format!("@prefix rdfs: <{}> .\n", iris::RDFS));
    out.push_str(&format!("@prefix xsd:  <{}> .\n", iris::XSD));
    out.push('\n');

    // Root ontology
    out.push_str(&format!(
        "<{}>\n  a owl:Ontology ;\n  rdfs:label {} ;\n  owl:versionInfo {} .\n\n",
        header.ontology_iri,
        turtle_string(&header.label),
        turtle_string(&header.version)
    ));

    // Annotation properties
    for ap in annotation_properties() {
        out.push_str(&format!(
            ":{}\n  a owl:AnnotationProperty ;\n  rdfs:label {} ;\n  rdfs:comment {} ;\n  rdfs:range xsd:string .\n\n",
            ap.name,
            turtle_string(ap.label),
            turtle_string(ap.comment)
        ));
    }

    for symbol in symbols {
        match symbol {
            Symbol::Class(class) => write_class(&mut out, class),
            Symbol::Property(prop) => write_property(&mut out, prop),
        }
    }

    out
}

fn write_class(out: &mut String, class: &ClassDescriptor) {
    let mut lines = vec![
        "a owl:Class".to_string(),
        format!("rdfs:label {}", turtle_string(&class.label)),
    ];
    if let Some(comment) = &class.comment {
        lines.push(format!("rdfs:comment {}", turtle_string(comment)));
    }
    if let Some(parent) = &class.parent {
        lines.push(format!("rdfs:subClassOf :{parent}"));
    }
    for other in &class.disjoint_with {
        lines.push(format!("owl:disjointWith :{other}"));
    }
    if let Some(deontic) = &class.deontic {
        lines.push(format!(":deonticModality \"{}\"", deontic.modality.as_str()));
        lines.push(format!(":modalityProvenance \"{}\"", deontic.provenance.as_str()));
    }
    if let Some(expr) = &class.equivalent_class {
        let mut rendered = String::new();
        write_expr(&mut rendered, expr, 1);
        lines.push(format!("owl:equivalentClass {rendered}"));
    }
    write_subject(out, &class.name, &lines);
}

fn write_property(out: &mut String, prop: &PropertyDescriptor) {
    let mut lines = vec![
        "a owl:DatatypeProperty , owl:FunctionalProperty".to_string(),
        format!("rdfs:label {}", turtle_string(&prop.label)),
    ];
    if let Some(deontic) = &prop.deontic {
        if let Provenance::Inferred { note } = &deontic.provenance {
            lines.push(format!("rdfs:comment {}", turtle_string(note)));
        }
    }
    lines.push(format!("rdfs:domain :{}", prop.domain));
    lines.push(format!("rdfs:range {}", prop.range.curie()));
    if let Some(deontic) = &prop.deontic {
        lines.push(format!(":deonticModality \"{}\"", deontic.modality.as_str()));
        lines.push(format!(":modalityProvenance \"{}\"", deontic.provenance.as_str()));
    }
    write_subject(out, &prop.name, &lines);
}

fn write_subject(out: &mut String, name: &str, lines: &[String]) {
    out.push_str(&format!(":{name}\n  "));
    out.push_str(&lines.join(" ;\n  "));
    out.push_str(" .\n\n");
}

/// Renders a restriction tree depth-first, preserving element order.
fn write_expr(out: &mut String, expr: &RestrictionExpr, depth: usize) {
    let pad = "  ".repeat(depth);
    match expr {
        RestrictionExpr::Value { property, value } => {
            let _ = write!(
                out,
                "[ a owl:Restriction ; owl:onProperty :{property} ; owl:hasValue \"{value}\"^^xsd:boolean ]"
            );
        }
        RestrictionExpr::Intersection(items) => write_list(out, "owl:intersectionOf", items, depth, &pad),
        RestrictionExpr::Union(items) => write_list(out, "owl:unionOf", items, depth, &pad),
    }
}

fn write_list(out: &mut String, predicate: &str, items: &[RestrictionExpr], depth: usize, pad: &str) {
    let _ = write!(out, "[\n{pad}  a owl:Class ;\n{pad}  {predicate} (");
    for item in items {
        let _ = write!(out, "\n{pad}    ");
        write_expr(out, item, depth + 2);
    }
    let _ = write!(out, "\n{pad}  )\n{pad}]");
}

fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"", escaped)
}
