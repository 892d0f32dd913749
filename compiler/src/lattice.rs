//! Compliance lattice construction and the partition check.
//!
//! For a rule class `C` with conclusion predicates `P` and exceptional flag
//! `E`:
//!
//! - `C_Default   ≡ ∧ (p = true)`
//! - `C_Mitigated ≡ (∨ (p = false)) ∧ E = true`
//! - `C_Violating ≡ (∨ (p = false)) ∧ E = false`
//!
//! The union node is kept even when `P` has one element, so every rule has
//! the same shape.

use lexowl_ontology::{
    Branch, ClassDescriptor, ClassKey, PropertyDescriptor, Range, RestrictionExpr, Signature,
    Staging,
};

use crate::error::CompileError;

/// Largest variable count [`check_partition`] enumerates.
pub const MAX_PARTITION_VARIABLES: usize = 16;

/// Names minted for one rule's lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    /// The rule-qualified class the lattice refines.
    pub rule_class: String,
    /// The exceptional-circumstance property.
    pub exceptional: String,
    /// Class of every predicate holding.
    pub default: String,
    /// Class of excused non-compliance.
    pub mitigated: String,
    /// Class of unexcused non-compliance.
    pub violating: String,
}

impl Lattice {
    /// Class names paired with their branch, in emission order.
    #[must_use]
    pub fn branches(&self) -> [(Branch, &str); 3] {
        [
            (Branch::Default, self.default.as_str()),
            (Branch::Mitigated, self.mitigated.as_str()),
            (Branch::Violating, self.violating.as_str()),
        ]
    }
}

/// Defining restriction of `branch` over `predicates` and `exceptional`.
#[must_use]
pub fn branch_expr(branch: Branch, predicates: &[String], exceptional: &str) -> RestrictionExpr {
    let failed = || {
        RestrictionExpr::Union(
            predicates
                .iter()
                .map(|p| RestrictionExpr::value(p.as_str(), false))
                .collect(),
        )
    };
    match branch {
        Branch::Default => RestrictionExpr::Intersection(
            predicates
                .iter()
                .map(|p| RestrictionExpr::value(p.as_str(), true))
                .collect(),
        ),
        Branch::Mitigated => {
            RestrictionExpr::Intersection(vec![failed(), RestrictionExpr::value(exceptional, true)])
        }
        Branch::Violating => RestrictionExpr::Intersection(vec![
            failed(),
            RestrictionExpr::value(exceptional, false),
        ]),
    }
}

/// Mints the exceptional flag and the three compliance classes of `rule`.
///
/// # Errors
///
/// Returns [`CompileError::UnencodableRule`] when `predicates` is empty;
/// nothing is staged in that case.
pub fn build(
    scope: &mut Staging<'_>,
    rule: &str,
    predicates: &[String],
    conclusion: &str,
) -> Result<Lattice, CompileError> {
    if predicates.is_empty() {
        return Err(CompileError::UnencodableRule {
            conclusion: conclusion.to_string(),
        });
    }

    let exceptional = scope.ensure_property(PropertyDescriptor {
        name: format!("exceptionalCircumstance_{rule}"),
        signature: Signature::exceptional_circumstance(),
        label: format!("exceptional circumstance applies ({rule})"),
        domain: rule.to_string(),
        range: Range::Boolean,
        deontic: None,
    });

    let mut mint = |branch: Branch, disjoint_with: Vec<String>| {
        let mut draft = ClassDescriptor::new(
            format!("{rule}_{}", branch.as_str()),
            ClassKey::Lattice {
                rule: rule.to_string(),
                branch,
                predicates: predicates.to_vec(),
            },
            format!("{rule} ({})", branch.as_str().to_lowercase()),
            Some(rule.to_string()),
        );
        draft.comment = Some(branch_comment(branch).to_string());
        draft.equivalent_class = Some(branch_expr(branch, predicates, &exceptional));
        draft.disjoint_with = disjoint_with;
        scope.ensure_class(draft)
    };
    let default = mint(Branch::Default, Vec::new());
    let mitigated = mint(Branch::Mitigated, vec![default.clone()]);
    let violating = mint(Branch::Violating, vec![default.clone(), mitigated.clone()]);

    Ok(Lattice {
        rule_class: rule.to_string(),
        exceptional,
        default,
        mitigated,
        violating,
    })
}

fn branch_comment(branch: Branch) -> &'static str {
    match branch {
        Branch::Default => "Compliant: every conclusion predicate holds.",
        Branch::Mitigated => {
            "Excused: some conclusion predicate fails while an exceptional circumstance applies."
        }
        Branch::Violating => {
            "Violation: some conclusion predicate fails and no exceptional circumstance applies."
        }
    }
}

/// An assignment under which the compliance classes do not partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionViolation {
    /// The offending assignment, in variable order.
    pub assignment: Vec<(String, bool)>,
    /// Branches whose restriction holds under it (zero or several).
    pub holding: Vec<Branch>,
}

impl std::fmt::Display for PartitionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let assignment: Vec<String> = self
            .assignment
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let holding: Vec<&str> = self.holding.iter().map(|b| b.as_str()).collect();
        write!(
            f,
            "{{{}}} satisfies {} branches [{}]",
            assignment.join(", "),
            self.holding.len(),
            holding.join(", ")
        )
    }
}

/// Why a partition check could not be completed, or where it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// Exactly one branch must hold; this assignment breaks that.
    Violation(PartitionViolation),
    /// Too many distinct properties to enumerate.
    TooManyVariables(usize),
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::Violation(v) => write!(f, "{v}"),
            PartitionError::TooManyVariables(n) => write!(
                f,
                "{n} variables exceed the enumeration limit of {MAX_PARTITION_VARIABLES}"
            ),
        }
    }
}

/// Checks that exactly one of `branches` holds under every boolean
/// assignment to the properties they reference. Unreferenced properties play
/// no role. Returns the number of assignments checked.
///
/// # Errors
///
/// Returns the first assignment that satisfies zero or several branches, or
/// [`PartitionError::TooManyVariables`] past [`MAX_PARTITION_VARIABLES`].
pub fn check_partition(branches: &[(Branch, &RestrictionExpr)]) -> Result<usize, PartitionError> {
    let mut variables: Vec<&str> = Vec::new();
    for (_, expr) in branches {
        for property in expr.properties() {
            if !variables.contains(&property) {
                variables.push(property);
            }
        }
    }
    if variables.len() > MAX_PARTITION_VARIABLES {
        return Err(PartitionError::TooManyVariables(variables.len()));
    }

    let total = 1usize << variables.len();
    for bits in 0..total {
        let assign = |name: &str| {
            variables
                .iter()
                .position(|v| *v == name)
                .map(|i| bits & (1 << i) != 0)
        };
        let holding: Vec<Branch> = branches
            .iter()
            .filter(|(_, expr)| expr.evaluate(&assign) == Some(true))
            .map(|(branch, _)| *branch)
            .collect();
        if holding.len() != 1 {
            return Err(PartitionError::Violation(PartitionViolation {
                assignment: variables
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (v.to_string(), bits & (1 << i) != 0))
                    .collect(),
                holding,
            }));
        }
    }
    Ok(total)
}
