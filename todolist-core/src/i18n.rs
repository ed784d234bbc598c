//! User-facing message catalog
//!
//! Service operations report failures as plain strings. The text comes from
//! this catalog so the front end can pick the language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported message languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    /// The other supported locale
    pub fn toggled(&self) -> Self {
        match self {
            Locale::ZhCn => Locale::EnUs,
            Locale::EnUs => Locale::ZhCn,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-cn" | "zh" => Ok(Locale::ZhCn),
            "en-us" | "en" => Ok(Locale::EnUs),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

/// Every message a service operation can hand to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CredentialsRequired,
    UsernameExists,
    NotRegistered,
    WrongCredentials,
    SignUpFailed,
    SignInFailed,
    SignOutFailed,
    TaskRequired,
    TodoNotFound,
    LoadTodosFailed,
    AddTodoFailed,
    UpdateTodoFailed,
    DeleteTodoFailed,
}

impl Message {
    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::ZhCn => match self {
                Message::CredentialsRequired => "用户名和密码不能为空",
                Message::UsernameExists => "用户名已存在",
                Message::NotRegistered => "用户未注册，请先注册账户",
                Message::WrongCredentials => "用户名或密码错误",
                Message::SignUpFailed => "注册过程中发生错误",
                Message::SignInFailed => "登录过程中发生错误",
                Message::SignOutFailed => "退出登录时发生错误",
                Message::TaskRequired => "任务内容不能为空",
                Message::TodoNotFound => "待办事项不存在",
                Message::LoadTodosFailed => "获取待办事项时发生错误",
                Message::AddTodoFailed => "添加待办事项时发生错误",
                Message::UpdateTodoFailed => "更新待办事项时发生错误",
                Message::DeleteTodoFailed => "删除待办事项时发生错误",
            },
            Locale::EnUs => match self {
                Message::CredentialsRequired => "Username and password are required",
                Message::UsernameExists => "Username already exists",
                Message::NotRegistered => "User is not registered, please sign up first",
                Message::WrongCredentials => "Wrong username or password",
                Message::SignUpFailed => "An error occurred while signing up",
                Message::SignInFailed => "An error occurred while signing in",
                Message::SignOutFailed => "An error occurred while signing out",
                Message::TaskRequired => "Task must not be empty",
                Message::TodoNotFound => "Todo not found",
                Message::LoadTodosFailed => "An error occurred while loading todos",
                Message::AddTodoFailed => "An error occurred while adding the todo",
                Message::UpdateTodoFailed => "An error occurred while updating the todo",
                Message::DeleteTodoFailed => "An error occurred while deleting the todo",
            },
        }
    }
}
