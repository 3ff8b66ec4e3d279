//! Dialogs opened by toolbar actions that need input.

use super::{Form, FormField, ModalBody, ModalConfig, UploadPanel};
use crate::menu::DialogKind;
use crate::transform::{LinkSpec, TableSize, Transform};

pub const UPLOAD_HINT: &str = "将文件拖拽至此处或输入路径后回车";
pub const UPLOAD_DISABLED_HINT: &str = "未配置上传目录";

pub fn for_kind(kind: DialogKind, can_upload: bool) -> ModalConfig {
    match kind {
        DialogKind::Link => link(),
        DialogKind::Image => image(),
        DialogKind::Table => table(),
        DialogKind::Upload => upload(can_upload),
    }
}

fn link_form(title: &str, fields: [(&str, &str); 2], image: bool) -> ModalConfig {
    let [(title_label, title_hint), (url_label, url_hint)] = fields;
    ModalConfig {
        title: title.to_string(),
        body: ModalBody::Form(Form::new(vec![
            FormField::new("title", title_label, title_hint, ""),
            FormField::new("url", url_label, url_hint, ""),
        ])),
        on_confirm: Some(Box::new(move |body| {
            let form = body.form()?;
            let spec = LinkSpec::new(form.value("title"), form.value("url"));
            Some(if image {
                Transform::Image(spec)
            } else {
                Transform::Link(spec)
            })
        })),
        ..ModalConfig::default()
    }
}

pub fn link() -> ModalConfig {
    link_form(
        "超链接",
        [("链接标题", "请输入链接标题"), ("链接地址", "请输入链接地址")],
        false,
    )
}

pub fn image() -> ModalConfig {
    link_form(
        "本地/网络图片",
        [("图片名称", "请输入图片名称"), ("图片地址", "请输入图片地址")],
        true,
    )
}

pub fn table() -> ModalConfig {
    ModalConfig {
        title: "表格".to_string(),
        body: ModalBody::Form(Form::new(vec![
            FormField::new("row", "表格行", "", "3"),
            FormField::new("column", "表格列", "", "3"),
        ])),
        on_confirm: Some(Box::new(|body| {
            let form = body.form()?;
            Some(Transform::Table(TableSize::parse(
                form.value("row"),
                form.value("column"),
            )))
        })),
        ..ModalConfig::default()
    }
}

/// The attachment picker. Confirming with nothing uploaded inserts nothing.
pub fn upload(can_upload: bool) -> ModalConfig {
    ModalConfig {
        title: "上传附件".to_string(),
        body: ModalBody::Upload(UploadPanel::default()),
        on_open: Some(Box::new(move |body| {
            if let ModalBody::Upload(panel) = body {
                panel.enabled = can_upload;
            }
        })),
        on_confirm: Some(Box::new(|body| {
            let panel = body.upload()?;
            if panel.pending.is_empty() {
                return None;
            }
            Some(Transform::Attachments(panel.pending.clone()))
        })),
        ..ModalConfig::default()
    }
}
