use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Programming languages a project may declare as its main language.
///
/// Order is preserved for presentation; lookups are exact and case-sensitive.
pub const LANGUAGES: [&str; 129] = [
  "ABAP",
  "ActionScript",
  "Ada",
  "Apex",
  "AppleScript",
  "Arc",
  "Arduino",
  "ASP",
  "Assembly",
  "Augeas",
  "AutoHotkey",
  "Awk",
  "Bluespec",
  "Boo",
  "Bro",
  "C",
  "C#",
  "C++",
  "Ceylon",
  "Chisel",
  "CLIPS",
  "Clojure",
  "COBOL",
  "CoffeeScript",
  "ColdFusion",
  "Common Lisp",
  "Coq",
  "CSS",
  "D",
  "Dart",
  "DCPU-16 ASM",
  "DOT",
  "Dylan",
  "eC",
  "Ecl",
  "Eiffel",
  "Elixir",
  "Elm",
  "Emacs Lisp",
  "Erlang",
  "F#",
  "Factor",
  "Fancy",
  "Fantom",
  "Forth",
  "FORTRAN",
  "Go",
  "Gosu",
  "Groovy",
  "Haskell",
  "Haxe",
  "HTML",
  "Io",
  "Ioke",
  "J",
  "Java",
  "JavaScript",
  "Julia",
  "Kotlin",
  "Lasso",
  "LiveScript",
  "Logos",
  "Logtalk",
  "Lua",
  "M",
  "Markdown",
  "Matlab",
  "Max",
  "Mirah",
  "Monkey",
  "MoonScript",
  "Nemerle",
  "Nimrod",
  "Nu",
  "Objective-C",
  "Objective-J",
  "OCaml",
  "Omgrofl",
  "ooc",
  "Opa",
  "OpenEdge ABL",
  "Parrot",
  "Pascal",
  "Perl",
  "Perl 6",
  "PHP",
  "Pike",
  "PogoScript",
  "PowerShell",
  "Processing",
  "Prolog",
  "Puppet",
  "Pure Data",
  "Python",
  "R",
  "Racket",
  "Ragel in Ruby Host",
  "Rebol",
  "Rouge",
  "Ruby",
  "Rust",
  "Scala",
  "Scheme",
  "Scilab",
  "Self",
  "Shell",
  "Slash",
  "Smalltalk",
  "Squirrel",
  "Standard ML",
  "SuperCollider",
  "Swift",
  "Tcl",
  "Turing",
  "TXL",
  "TypeScript",
  "Vala",
  "Verilog",
  "VHDL",
  "VimL",
  "Visual Basic",
  "Volt",
  "wisp",
  "XC",
  "XML",
  "XProc",
  "XQuery",
  "XSLT",
  "Xtend",
];

static LANGUAGE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| LANGUAGES.iter().copied().collect());

pub fn is_known_language(name: &str) -> bool {
  LANGUAGE_SET.contains(name)
}
