use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Orders tables by their foreign key dependencies
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Given a set of requested tables, resolve all required parents.
    /// Returns tables in dependency order (parents before children)
    pub fn resolve_includes(&self, requested: &[&str]) -> Result<Vec<&'static TableSchema>> {
        let mut included: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = requested.iter().copied().collect();

        while let Some(table_name) = queue.pop_front() {
            if included.contains(table_name) {
                continue;
            }

            if get_table(table_name).is_none() {
                return Err(Error::UnknownTable(table_name.to_string()));
            }

            included.insert(table_name);

            if let Some(table_deps) = self.deps.get(table_name) {
                for dep in table_deps {
                    if !included.contains(dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        self.topological_sort(&included)
    }

    /// All tables in the order they must be created
    pub fn creation_order(&self) -> Result<Vec<&'static TableSchema>> {
        let all: HashSet<&str> = ALL_TABLES.iter().map(|t| t.name).collect();
        self.topological_sort(&all)
    }

    /// All tables in the order they can be dropped (children first)
    pub fn drop_order(&self) -> Result<Vec<&'static TableSchema>> {
        let mut tables = self.creation_order()?;
        tables.reverse();
        Ok(tables)
    }

    /// Position of a table in creation order; unknown tables sort last
    pub fn rank(&self, name: &str) -> usize {
        self.creation_order()
            .ok()
            .and_then(|order| order.iter().position(|t| t.name == name))
            .unwrap_or(usize::MAX)
    }

    /// Topological sort of tables by dependencies. Ties keep catalog order.
    fn topological_sort(&self, included: &HashSet<&str>) -> Result<Vec<&'static TableSchema>> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in ALL_TABLES.iter().filter(|t| included.contains(t.name)) {
            if !visited.contains(table.name) {
                self.visit(
                    table.name,
                    included,
                    &mut visited,
                    &mut temp_visited,
                    &mut result,
                )?;
            }
        }

        Ok(result)
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        included: &HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<()> {
        if temp_visited.contains(name) {
            return Err(Error::CircularDependency(name.to_string()));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        // Sorted so sibling parents are visited the same way on every run
        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<&'static str> = deps.iter().copied().collect();
            deps.sort_by_key(|d| ALL_TABLES.iter().position(|t| t.name == *d));
            for dep in deps {
                if dep != name && included.contains(dep) {
                    self.visit(dep, included, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        if let Some(table) = get_table(name) {
            result.push(table);
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(tables: &[&TableSchema], name: &str) -> usize {
        tables.iter().position(|t| t.name == name).unwrap()
    }

    #[test]
    fn test_resolve_mapping_result_includes_parents() {
        let resolver = DependencyResolver::new();
        let tables = resolver.resolve_includes(&["mapping_result"]).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        assert_eq!(names, vec!["point_of_interest", "mapping_result"]);
    }

    #[test]
    fn test_resolve_association_pulls_both_sides() {
        let resolver = DependencyResolver::new();
        let tables = resolver
            .resolve_includes(&["analysis_coverage_association"])
            .unwrap();

        assert_eq!(tables.len(), 4);
        assert!(position(&tables, "cost_parameter") < position(&tables, "analysis"));
        assert!(
            position(&tables, "analysis") < position(&tables, "analysis_coverage_association")
        );
        assert!(
            position(&tables, "cell_coverage")
                < position(&tables, "analysis_coverage_association")
        );
    }

    #[test]
    fn test_creation_order_puts_parents_first() {
        let resolver = DependencyResolver::new();
        let order = resolver.creation_order().unwrap();

        assert_eq!(order.len(), ALL_TABLES.len());
        for table in &order {
            for fk in table.foreign_keys {
                assert!(position(&order, fk.references_table) < position(&order, table.name));
            }
        }
    }

    #[test]
    fn test_drop_order_is_reverse_of_creation() {
        let resolver = DependencyResolver::new();
        let create: Vec<_> = resolver.creation_order().unwrap().iter().map(|t| t.name).collect();
        let mut drop: Vec<_> = resolver.drop_order().unwrap().iter().map(|t| t.name).collect();
        drop.reverse();
        assert_eq!(create, drop);
    }

    #[test]
    fn test_rank() {
        let resolver = DependencyResolver::new();
        assert!(resolver.rank("point_of_interest") < resolver.rank("cost_result_poi"));
        assert_eq!(resolver.rank("nonexistent"), usize::MAX);
    }

    #[test]
    fn test_unknown_table_error() {
        let resolver = DependencyResolver::new();
        let result = resolver.resolve_includes(&["nonexistent"]);
        assert!(matches!(result, Err(Error::UnknownTable(name)) if name == "nonexistent"));
    }
}
