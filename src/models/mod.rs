//! 数据模型模块
//! 用户与账户模型 + 课程目录实体（院系、课程、教学大纲）

pub mod auth;
pub mod course;
pub mod department;
pub mod syllabus;
pub mod user;

/// 选项表条目，序列化为 {"value": ..., "label": ...}
#[derive(Debug, serde::Serialize)]
pub struct ChoiceEntry {
    pub value: &'static str,
    pub label: &'static str,
}

/// 把 (value, label) 选项表转换为响应条目
pub fn choice_entries(choices: &'static [(&'static str, &'static str)]) -> Vec<ChoiceEntry> {
    choices
        .iter()
        .map(|(value, label)| ChoiceEntry { value, label })
        .collect()
}

/// 校验取值是否在选项表中
pub fn is_valid_choice(choices: &[(&str, &str)], value: &str) -> bool {
    choices.iter().any(|(v, _)| *v == value)
}
