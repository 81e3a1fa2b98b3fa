//! Declared load plan.
//!
//! The order in which relations load is data, not call-order convention:
//! each relation declares the relations it depends on, and the plan is
//! topologically sorted so dimensions land before the facts that reference
//! them.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::contract::{self, TableContract};

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised while ordering the load plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("relation '{relation}' depends on undeclared relation '{dependency}'")]
    UnknownDependency {
        relation: &'static str,
        dependency: &'static str,
    },

    #[error("load plan has a dependency cycle through '{0}'")]
    CyclicDependency(&'static str),
}

/// One relation in the plan, with its dependency edges.
#[derive(Debug, Clone)]
pub struct RelationPlan {
    pub contract: &'static TableContract,
    pub depends_on: Vec<&'static str>,
}

/// Ordered set of relations to load.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    relations: Vec<RelationPlan>,
}

impl LoadPlan {
    pub fn new(relations: Vec<RelationPlan>) -> Self {
        Self { relations }
    }

    /// The standard star-schema plan: both dimensions, then the fact table
    /// that references them.
    pub fn warehouse_default() -> Self {
        Self::new(vec![
            RelationPlan {
                contract: &contract::CUSTOMERS,
                depends_on: vec![],
            },
            RelationPlan {
                contract: &contract::PRODUCTS,
                depends_on: vec![],
            },
            RelationPlan {
                contract: &contract::SALES,
                depends_on: vec!["customers", "products"],
            },
        ])
    }

    pub fn relations(&self) -> &[RelationPlan] {
        &self.relations
    }

    /// Relations in dependency order (dependencies first).
    pub fn ordered(&self) -> PlanResult<Vec<&RelationPlan>> {
        let mut graph: DiGraphMap<&'static str, ()> = DiGraphMap::new();
        for rel in &self.relations {
            graph.add_node(rel.contract.relation);
        }
        for rel in &self.relations {
            for &dep in &rel.depends_on {
                if !graph.contains_node(dep) {
                    return Err(PlanError::UnknownDependency {
                        relation: rel.contract.relation,
                        dependency: dep,
                    });
                }
                graph.add_edge(dep, rel.contract.relation, ());
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| PlanError::CyclicDependency(cycle.node_id()))?;

        Ok(order
            .into_iter()
            .map(|name| {
                self.relations
                    .iter()
                    .find(|rel| rel.contract.relation == name)
                    .expect("toposort yields only declared relations")
            })
            .collect())
    }
}
