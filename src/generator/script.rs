//! # Script Generators Module / 脚本生成器模块
//!
//! Script generators render the same requests as the declarative ones, but as
//! Python source: pytest + allure for API, web and mobile, Locust for load
//! tests. The output is never executed at generation time.
//!
//! 脚本生成器将与声明式生成器相同的请求渲染为 Python 源码：
//! API、Web 和移动端使用 pytest + allure，性能测试使用 Locust。生成时从不执行输出。

pub mod api;
pub mod literal;
pub mod mobile;
pub mod perf;
pub mod web;

pub use api::ApiScriptGenerator;
pub use mobile::MobileScriptGenerator;
pub use perf::PerfScriptGenerator;
pub use web::WebScriptGenerator;

use crate::generator::naming::{is_identifier, test_class_name};
use literal::{py_doc, py_str};

const INDENT: &str = "    ";

/// Line-oriented builder for indented Python source.
/// 按行构建带缩进的 Python 源码。
#[derive(Debug, Default)]
pub struct ScriptWriter {
    lines: Vec<String>,
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` at the given indentation level.
    pub fn line(&mut self, level: usize, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("{}{}", INDENT.repeat(level), text.as_ref()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// Appends a triple-quoted docstring, one line per line of `text`.
    pub fn docstring(&mut self, level: usize, text: &str) -> &mut Self {
        let text = py_doc(text);
        if text.contains('\n') || text.ends_with('"') {
            self.line(level, "\"\"\"");
            for line in text.lines() {
                if line.is_empty() {
                    self.blank();
                } else {
                    self.line(level, line);
                }
            }
            self.line(level, "\"\"\"")
        } else {
            self.line(level, format!("\"\"\"{}\"\"\"", text))
        }
    }

    pub fn finish(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Reporting tags placed on a pytest test class.
#[derive(Debug, Clone)]
pub struct SuiteHeader<'a> {
    pub feature: &'a str,
    pub story: &'a str,
    pub title: &'a str,
    pub class_name: String,
}

impl<'a> SuiteHeader<'a> {
    /// Resolves the class name: a caller-supplied one if it is a valid
    /// identifier, otherwise `Test<Words>` derived from the case name.
    pub fn new(
        name: &'a str,
        title: &'a str,
        class_name: Option<&str>,
        feature: Option<&'a str>,
        default_feature: &'a str,
        story: Option<&'a str>,
    ) -> Self {
        let class_name = match class_name {
            Some(class_name) if is_identifier(class_name) => class_name.to_string(),
            _ => test_class_name(name),
        };
        Self {
            feature: feature.filter(|f| !f.trim().is_empty()).unwrap_or(default_feature),
            story: story.filter(|s| !s.trim().is_empty()).unwrap_or(name),
            title,
            class_name,
        }
    }

    /// Writes the module docstring, imports, module-level setup lines, the
    /// reporting tags and the class line with its docstring.
    pub fn write_header(&self, out: &mut ScriptWriter, imports: &[&str], module_setup: &[String]) {
        out.docstring(0, self.title);
        for import in imports {
            out.line(0, *import);
        }
        if !module_setup.is_empty() {
            out.blank();
            for line in module_setup {
                out.line(0, line);
            }
        }
        out.blank().blank();
        out.line(0, format!("@allure.feature({})", py_str(self.feature)));
        out.line(0, format!("@allure.story({})", py_str(self.story)));
        out.line(0, format!("class {}:", self.class_name));
        out.docstring(1, self.title);
        out.blank();
    }

    /// Writes the decorators of the test method.
    pub fn write_test_decorators(&self, out: &mut ScriptWriter) {
        out.line(1, format!("@allure.title({})", py_str(self.title)));
        out.line(1, "@allure.severity(allure.severity_level.NORMAL)");
    }

    /// Header followed directly by the test decorators.
    pub fn write_preamble(&self, out: &mut ScriptWriter, imports: &[&str]) {
        self.write_header(out, imports, &[]);
        self.write_test_decorators(out);
    }
}
