//! 确定性DOM遍历器
//!
//! 提取器和注入器共享同一个遍历器，保证第 N 个可翻译位置在两个阶段中指向同一处：
//!
//! - 先序遍历，子节点按源码顺序访问
//! - 元素自身的可翻译属性按源码属性顺序，在其子节点之前访问
//! - 跳过集合中的元素整棵子树都不进入（包括它们自己的属性）
//! - 只含空白的文本节点和属性值不产生位置
//!
//! 每个位置都带有类 XPath 的定位路径，例如 `/html[1]/body[1]/p[2]/text()[1]`
//! 或 `/div[1]/img[1]/@alt`，同名兄弟节点从 1 开始编号。

use std::collections::HashMap;

use markup5ever_rcdom::{Handle, NodeData};

use super::utils::is_blank;
use crate::translation::config::constants;

/// 可翻译位置的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Text,
    Attribute,
}

/// 遍历时产出的一个可翻译位置
#[derive(Debug, Clone)]
pub struct TranslatableSlot {
    pub kind: SlotKind,
    /// 文本节点本身，或拥有该属性的元素
    pub node: Handle,
    /// 属性名（仅属性位置）
    pub attribute: Option<String>,
    pub path: String,
    /// 未修剪的原始值
    pub raw_value: String,
}

/// 遍历规则：哪些元素跳过，哪些属性可翻译
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalRules {
    pub skip_elements: Vec<String>,
    pub translatable_attrs: Vec<String>,
}

impl Default for TraversalRules {
    fn default() -> Self {
        Self {
            skip_elements: constants::SKIP_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            translatable_attrs: constants::TRANSLATABLE_ATTRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl TraversalRules {
    pub fn skips(&self, element: &str) -> bool {
        self.skip_elements
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(element))
    }

    pub fn is_translatable_attr(&self, attr: &str) -> bool {
        self.translatable_attrs
            .iter()
            .any(|name| name.eq_ignore_ascii_case(attr))
    }
}

/// DOM遍历器
pub struct DomWalker<'a> {
    rules: &'a TraversalRules,
}

impl<'a> DomWalker<'a> {
    pub fn new(rules: &'a TraversalRules) -> Self {
        Self { rules }
    }

    /// 从根节点开始遍历，按确定顺序对每个可翻译位置调用 `visit`
    ///
    /// 根节点本身不产生路径段，路径从它的子节点开始。
    pub fn walk<F>(&self, root: &Handle, mut visit: F)
    where
        F: FnMut(TranslatableSlot),
    {
        self.walk_children(root, "", &mut visit);
    }

    /// 收集所有可翻译位置
    pub fn collect(&self, root: &Handle) -> Vec<TranslatableSlot> {
        let mut slots = Vec::new();
        self.walk(root, |slot| slots.push(slot));
        slots
    }

    fn walk_children<F>(&self, parent: &Handle, parent_path: &str, visit: &mut F)
    where
        F: FnMut(TranslatableSlot),
    {
        // 先复制子节点列表，访问者修改节点内容时不会与这里的借用冲突
        let children: Vec<Handle> = parent.children.borrow().iter().cloned().collect();
        let mut counters: HashMap<String, usize> = HashMap::new();

        for child in children {
            match &child.data {
                NodeData::Element { name, .. } => {
                    let tag = name.local.to_ascii_lowercase();
                    let index = next_index(&mut counters, &tag);
                    let path = format!("{}/{}[{}]", parent_path, tag, index);
                    self.walk_element(&child, &tag, &path, visit);
                }
                NodeData::Text { contents } => {
                    let index = next_index(&mut counters, "text()");
                    let raw_value = contents.borrow().to_string();
                    if is_blank(&raw_value) {
                        continue;
                    }
                    visit(TranslatableSlot {
                        kind: SlotKind::Text,
                        node: child.clone(),
                        attribute: None,
                        path: format!("{}/text()[{}]", parent_path, index),
                        raw_value,
                    });
                }
                _ => {}
            }
        }
    }

    fn walk_element<F>(&self, node: &Handle, tag: &str, path: &str, visit: &mut F)
    where
        F: FnMut(TranslatableSlot),
    {
        if self.rules.skips(tag) {
            return;
        }

        // 属性同样先复制出来再访问
        let attrs: Vec<(String, String)> = match &node.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            _ => Vec::new(),
        };

        for (name, value) in attrs {
            if !self.rules.is_translatable_attr(&name) || is_blank(&value) {
                continue;
            }
            visit(TranslatableSlot {
                kind: SlotKind::Attribute,
                node: node.clone(),
                path: format!("{}/@{}", path, name),
                attribute: Some(name),
                raw_value: value,
            });
        }

        self.walk_children(node, path, visit);
    }
}

fn next_index(counters: &mut HashMap<String, usize>, key: &str) -> usize {
    let counter = counters.entry(key.to_string()).or_insert(0);
    *counter += 1;
    *counter
}
