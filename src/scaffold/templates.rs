//! File templates for new extensions.
//!
//! Placeholders: `{{CLASS}}` (PascalCase class name), `{{ID}}` (manifest id)
//! and `{{NAME}}` (display name).

use serde_json::{Value, json};

use super::Language;

const JAVASCRIPT_ENTRY: &str = r#"import Extension from '@codeinspector/extension-handler';

class {{CLASS}}Extension extends Extension {
  activate() {
    console.log(`${this.name} activated`);

    // Register a command
    this.registerCommand('{{ID}}.action', () => {
      this.showNotification('{{NAME}}', 'Action executed!');
      return { status: 'success' };
    });

    // Register a menu item
    this.registerMenu({
      id: '{{ID}}-menu',
      label: '{{NAME}}',
      submenu: [
        {
          id: '{{ID}}.action',
          label: 'Execute Action',
          command: '{{ID}}.action'
        }
      ]
    });

    // Register a command menu item (appears in command palette)
    this.registerCommandMenu({
      id: '{{ID}}.command-palette-action',
      name: '{{NAME}}: Execute Action',
      action: 'executeExtensionCommand',
      extensionId: this.id,
      command: 'action',
      description: 'Execute action from {{NAME}}',
      shortcut: 'Ctrl+Shift+M'
    });
  }

  deactivate() {
    console.log(`${this.name} deactivated`);
  }

  action() {
    this.showNotification('{{NAME}}', 'Command palette action executed!');
    return { status: 'success' };
  }
}

export default {{CLASS}}Extension;
"#;

const TYPESCRIPT_ENTRY: &str = r#"import Extension, { CommandMenuConfig, MenuConfig } from '@codeinspector/extension-handler';

class {{CLASS}}Extension extends Extension {
  activate(): void {
    console.log(`${this.name} activated`);

    // Register a command
    this.registerCommand('{{ID}}.action', () => {
      this.showNotification('{{NAME}}', 'Action executed!');
      return { status: 'success' };
    });

    // Register a menu item with proper typing
    const menuConfig: MenuConfig = {
      id: '{{ID}}-menu',
      label: '{{NAME}}',
      submenu: [
        {
          id: '{{ID}}.action',
          label: 'Execute Action',
          command: '{{ID}}.action'
        }
      ]
    };
    this.registerMenu(menuConfig);

    // Register a command menu item (appears in command palette)
    const commandMenuConfig: CommandMenuConfig = {
      id: '{{ID}}.command-palette-action',
      name: '{{NAME}}: Execute Action',
      action: 'executeExtensionCommand',
      extensionId: this.id,
      command: 'action',
      description: 'Execute action from {{NAME}}',
      shortcut: 'Ctrl+Shift+M'
    };
    this.registerCommandMenu(commandMenuConfig);
  }

  deactivate(): void {
    console.log(`${this.name} deactivated`);
  }

  action(): { status: string } {
    this.showNotification('{{NAME}}', 'Command palette action executed!');
    return { status: 'success' };
  }
}

export default {{CLASS}}Extension;
"#;

pub const GITIGNORE: &str = "node_modules/\ndist/\n*.log\n.DS_Store\n";

/// Entry file source for the chosen language.
pub fn entry_source(language: Language, class: &str, id: &str, name: &str) -> String {
    let template = match language {
        Language::JavaScript => JAVASCRIPT_ENTRY,
        Language::TypeScript => TYPESCRIPT_ENTRY,
    };
    template
        .replace("{{CLASS}}", class)
        .replace("{{ID}}", id)
        .replace("{{NAME}}", name)
}

pub fn readme(name: &str, description: &str, source_file: &str) -> String {
    format!(
        "# {name}\n\n{description}\n\n## Installation\n\n```bash\nnpm install\n```\n\n\
         ## Development\n\nEdit `{source_file}` to add your extension logic.\n\n\
         ## Publishing\n\n```bash\ncodeinspector publish\n```\n"
    )
}

pub fn tsconfig() -> Value {
    json!({
        "compilerOptions": {
            "target": "ES2020",
            "module": "ESNext",
            "lib": ["ES2020"],
            "declaration": true,
            "declarationMap": true,
            "sourceMap": true,
            "outDir": "./dist",
            "rootDir": "./src",
            "strict": true,
            "esModuleInterop": true,
            "skipLibCheck": true,
            "forceConsistentCasingInFileNames": true
        },
        "include": ["src/**/*"],
        "exclude": ["node_modules", "dist"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_placeholders_are_filled() {
        for language in [Language::JavaScript, Language::TypeScript] {
            let source = entry_source(language, "MyCoolThing", "my-cool-thing", "My Cool Thing");
            assert!(!source.contains("{{"));
            assert!(source.contains("class MyCoolThingExtension extends Extension"));
            assert!(source.contains("this.registerCommand('my-cool-thing.action'"));
            assert!(source.contains("export default MyCoolThingExtension;"));
            // template literal in the generated code is kept verbatim
            assert!(source.contains("`${this.name} activated`"));
        }
    }

    #[test]
    fn test_readme_mentions_source_file() {
        let readme = readme("Demo", "A demo", "src/index.ts");
        assert!(readme.starts_with("# Demo\n\nA demo\n"));
        assert!(readme.contains("Edit `src/index.ts`"));
    }
}
