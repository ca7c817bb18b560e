// src/services/category_tree.rs

use std::collections::{HashMap, HashSet, VecDeque};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::round_money},
    models::menu::{CategoryRecord, CategoryTreeNode, IndentedCategory, MenuItem, MenuStatistics},
};

/// Níveis máximos da árvore (raiz = nível 1).
pub const MAX_CATEGORY_DEPTH: usize = 10;

// Registro já validado (com id garantido) usado internamente.
struct Flat<'a> {
    id: Uuid,
    record: &'a CategoryRecord,
}

struct TreeAssembler<'a> {
    // Pai efetivo -> filhos, na ordem de entrada. `None` = raiz.
    children_of: HashMap<Option<Uuid>, Vec<&'a Flat<'a>>>,
    placed: HashSet<Uuid>,
    // Filhos abaixo do nível máximo: viram raiz assim que o ramo atual termina.
    too_deep: VecDeque<&'a Flat<'a>>,
}

impl<'a> TreeAssembler<'a> {
    fn materialize(&mut self, node: &'a Flat<'a>, depth: usize) -> CategoryTreeNode {
        self.placed.insert(node.id);

        let kids = self.children_of.get(&Some(node.id)).cloned().unwrap_or_default();
        let mut children = Vec::with_capacity(kids.len());
        for child in kids {
            // Já posicionado = fecharia um ciclo. Este nó vira folha nesse ramo.
            if self.placed.contains(&child.id) {
                continue;
            }
            if depth + 1 >= MAX_CATEGORY_DEPTH {
                self.too_deep.push_back(child);
                continue;
            }
            children.push(self.materialize(child, depth + 1));
        }

        CategoryTreeNode {
            id: node.id,
            name: node.record.name.clone(),
            parent_id: node.record.parent_id,
            description: node.record.description.clone(),
            children,
        }
    }

    fn plant(&mut self, node: &'a Flat<'a>, tree: &mut Vec<CategoryTreeNode>) {
        if self.placed.contains(&node.id) {
            return;
        }
        tree.push(self.materialize(node, 0));

        while let Some(deep) = self.too_deep.pop_front() {
            if !self.placed.contains(&deep.id) {
                tracing::warn!(
                    category_id = %deep.id,
                    "Categoria além do nível máximo, promovida a raiz"
                );
                tree.push(self.materialize(deep, 0));
            }
        }
    }
}

/// Monta a árvore de categorias a partir da lista plana.
///
/// - `parent_id` que não aponta para nenhuma categoria existente => raiz.
/// - Ciclos (A -> B -> A, ou A -> A) nunca travam: o nó que fecharia o ciclo
///   vira folha, e categorias que só existem dentro de um ciclo são promovidas
///   a raiz na ordem de entrada. Cada categoria aparece exatamente uma vez.
/// - Nenhum ramo passa de `MAX_CATEGORY_DEPTH` níveis: o que estiver abaixo
///   recomeça como raiz logo após o ramo de origem.
pub fn build_tree(categories: &[CategoryRecord]) -> Result<Vec<CategoryTreeNode>, AppError> {
    let mut flat = Vec::with_capacity(categories.len());
    for (index, record) in categories.iter().enumerate() {
        let id = record.id.ok_or_else(|| {
            AppError::invalid_field(
                "id",
                format!("a categoria na posição {} ('{}') não tem id", index, record.name),
            )
        })?;
        flat.push(Flat { id, record });
    }

    let known: HashSet<Uuid> = flat.iter().map(|f| f.id).collect();

    let mut children_of: HashMap<Option<Uuid>, Vec<&Flat>> = HashMap::new();
    for node in &flat {
        let parent = node.record.parent_id.filter(|p| known.contains(p));
        children_of.entry(parent).or_default().push(node);
    }

    let roots = children_of.get(&None).cloned().unwrap_or_default();
    let mut assembler = TreeAssembler {
        children_of,
        placed: HashSet::with_capacity(flat.len()),
        too_deep: VecDeque::new(),
    };

    let mut tree = Vec::with_capacity(roots.len());
    for root in roots {
        assembler.plant(root, &mut tree);
    }

    // Sobras: categorias presas em ciclos, inalcançáveis a partir das raízes.
    for node in &flat {
        if !assembler.placed.contains(&node.id) {
            tracing::warn!(
                category_id = %node.id,
                "Categoria em ciclo de parentesco, promovida a raiz"
            );
            assembler.plant(node, &mut tree);
        }
    }

    Ok(tree)
}

/// Percorre a árvore em pré-ordem, devolvendo cada nó com sua profundidade.
pub fn flatten_tree(roots: &[CategoryTreeNode]) -> Vec<IndentedCategory> {
    let mut out = Vec::new();
    let mut stack: Vec<(&CategoryTreeNode, usize)> =
        roots.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        out.push(IndentedCategory {
            id: node.id,
            name: node.name.clone(),
            depth,
        });
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

pub fn compute_menu_statistics(items: &[MenuItem]) -> MenuStatistics {
    let prices: Vec<Decimal> = items.iter().map(|item| item.price).collect();

    let (Some(min), Some(max)) = (prices.iter().min().copied(), prices.iter().max().copied()) else {
        return MenuStatistics {
            count: 0,
            average_price: Decimal::ZERO,
            price_range: None,
        };
    };

    let total: Decimal = prices.iter().sum();
    MenuStatistics {
        count: prices.len(),
        average_price: round_money(total / Decimal::from(prices.len())),
        price_range: Some([min, max]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Uuid, name: &str, parent_id: Option<Uuid>) -> CategoryRecord {
        CategoryRecord {
            id: Some(id),
            name: name.to_string(),
            parent_id,
            description: None,
        }
    }

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn item(price: Decimal) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            merchant_id: Uuid::nil(),
            category_id: None,
            name: "Item".to_string(),
            description: None,
            price,
            available: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn count_all(nodes: &[CategoryTreeNode]) -> usize {
        nodes.iter().map(|n| 1 + n.descendant_count()).sum()
    }

    #[test]
    fn empty_list_gives_empty_tree() {
        assert!(build_tree(&[]).unwrap().is_empty());
    }

    #[test]
    fn all_roots_keep_input_order() {
        let id = ids(3);
        let input = vec![
            record(id[0], "Bebidas", None),
            record(id[1], "Entradas", None),
            record(id[2], "Sobremesas", None),
        ];

        let tree = build_tree(&input).unwrap();

        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Bebidas", "Entradas", "Sobremesas"]);
        assert!(tree.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn nests_children_under_their_parent_in_input_order() {
        let id = ids(4);
        // Filho listado antes do pai: a ordem de entrada não pode importar.
        let input = vec![
            record(id[1], "Quentes", Some(id[0])),
            record(id[0], "Bebidas", None),
            record(id[2], "Frias", Some(id[0])),
            record(id[3], "Sucos", Some(id[2])),
        ];

        let tree = build_tree(&input).unwrap();

        assert_eq!(tree.len(), 1);
        let bebidas = &tree[0];
        assert_eq!(bebidas.id, id[0]);
        assert_eq!(bebidas.children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![id[1], id[2]]);
        assert_eq!(bebidas.children[1].children[0].id, id[3]);
        assert_eq!(bebidas.descendant_count(), 3);
    }

    #[test]
    fn orphan_becomes_root() {
        let id = ids(2);
        let input = vec![
            record(id[0], "Entradas", None),
            record(id[1], "Órfã", Some(Uuid::new_v4())),
        ];

        let tree = build_tree(&input).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].id, id[1]);
    }

    #[test]
    fn two_node_cycle_terminates_with_leaf() {
        let id = ids(2);
        let input = vec![
            record(id[0], "A", Some(id[1])),
            record(id[1], "B", Some(id[0])),
        ];

        let tree = build_tree(&input).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, id[0]);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].id, id[1]);
        assert!(tree[0].children[0].children.is_empty());
        assert_eq!(count_all(&tree), 2);
    }

    #[test]
    fn self_parent_is_promoted_to_root() {
        let id = ids(2);
        let input = vec![
            record(id[0], "Loop", Some(id[0])),
            record(id[1], "Filha", Some(id[0])),
        ];

        let tree = build_tree(&input).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].id, id[1]);
    }

    #[test]
    fn cycle_hanging_next_to_valid_tree_keeps_every_node_once() {
        let id = ids(5);
        let input = vec![
            record(id[0], "Raiz", None),
            record(id[1], "Filha", Some(id[0])),
            record(id[2], "X", Some(id[4])),
            record(id[3], "Y", Some(id[2])),
            record(id[4], "Z", Some(id[3])),
        ];

        let tree = build_tree(&input).unwrap();

        assert_eq!(count_all(&tree), 5);
        let flat_ids: HashSet<Uuid> = flatten_tree(&tree).iter().map(|c| c.id).collect();
        assert_eq!(flat_ids.len(), 5);
    }

    #[test]
    fn missing_id_is_rejected() {
        let input = vec![CategoryRecord {
            id: None,
            name: "Sem id".into(),
            parent_id: None,
            description: None,
        }];

        let err = build_tree(&input).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "id"));
    }

    #[test]
    fn flatten_reports_depth_in_pre_order() {
        let id = ids(3);
        let input = vec![
            record(id[0], "Pratos", None),
            record(id[1], "Veg", Some(id[0])),
            record(id[2], "Paneer", Some(id[1])),
        ];

        let flat = flatten_tree(&build_tree(&input).unwrap());

        let depths: Vec<(Uuid, usize)> = flat.iter().map(|c| (c.id, c.depth)).collect();
        assert_eq!(depths, vec![(id[0], 0), (id[1], 1), (id[2], 2)]);
    }

    #[test]
    fn statistics_on_empty_menu() {
        let stats = compute_menu_statistics(&[]);

        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_price, Decimal::ZERO);
        assert_eq!(stats.price_range, None);
    }

    #[test]
    fn statistics_average_and_range() {
        let stats = compute_menu_statistics(&[item(Decimal::from(10)), item(Decimal::from(30))]);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_price, Decimal::from(20));
        assert_eq!(stats.price_range, Some([Decimal::from(10), Decimal::from(30)]));
    }

    #[test]
    fn statistics_average_is_rounded() {
        // (10 + 10 + 10.01) / 3 = 10.00333...
        let stats = compute_menu_statistics(&[
            item(Decimal::from(10)),
            item(Decimal::from(10)),
            item(Decimal::new(1001, 2)),
        ]);

        assert_eq!(stats.average_price, Decimal::new(1000, 2));
        assert_eq!(stats.price_range, Some([Decimal::from(10), Decimal::new(1001, 2)]));
    }

    #[test]
    fn long_chain_is_capped_without_losing_categories() {
        // Cadeia linear: cada categoria é filha da anterior
        let id = ids(10_000);
        let input: Vec<CategoryRecord> = id
            .iter()
            .enumerate()
            .map(|(i, cat)| record(*cat, &format!("Nível {}", i), i.checked_sub(1).map(|p| id[p])))
            .collect();

        let tree = build_tree(&input).unwrap();
        let flat = flatten_tree(&tree);

        assert_eq!(flat.len(), 10_000);
        assert_eq!(count_all(&tree), 10_000);
        assert!(flat.iter().all(|c| c.depth < MAX_CATEGORY_DEPTH));
        assert_eq!(tree.len(), 10_000 / MAX_CATEGORY_DEPTH);

        // Ordem preservada: o ramo cortado recomeça logo depois da raiz de origem
        let order: Vec<Uuid> = flat.iter().map(|c| c.id).collect();
        assert_eq!(order, id);
    }

    #[test]
    fn tree_within_depth_limit_is_untouched() {
        let id = ids(MAX_CATEGORY_DEPTH);
        let input: Vec<CategoryRecord> = id
            .iter()
            .enumerate()
            .map(|(i, cat)| record(*cat, "Sub", i.checked_sub(1).map(|p| id[p])))
            .collect();

        let tree = build_tree(&input).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].descendant_count(), MAX_CATEGORY_DEPTH - 1);
    }
}
