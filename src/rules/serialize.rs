use crate::io::{PrettyFormatter, produce_itemset};

use super::Rule;

pub struct RuleFormatter {
    show_metrics: bool,
    precision: usize,
}

impl PrettyFormatter<[Rule]> for RuleFormatter {

    fn format_pretty( &self, rules: &[Rule] ) -> String {
	let mut output = String::new();
	output.push( '\n' ); // so output begins on a new line
	rules.iter()
	    .map( |rule| self.format_rule( rule ))
	    .fold( output, |acc, rule_string| join_lines( acc, rule_string ))
    }
}

impl RuleFormatter {
    pub fn new() -> RuleFormatter {
	RuleFormatter {
	    show_metrics: false,
	    precision: 3,
	}
    }

    pub fn show_metrics( &mut self ) { self.show_metrics = true; }
    pub fn set_precision( &mut self, precision: usize ) { self.precision = precision; }

    fn format_rule( &self, rule: &Rule ) -> String {
	let antecedents = produce_itemset( rule.antecedents.iter(), "{", ", ", "}" );
	let consequents = produce_itemset( rule.consequents.iter(), "{", ", ", "}" );
	if self.show_metrics {
	    format!( "{antecedents} => {consequents}  support {:.p$}  confidence {:.p$}  lift {:.p$}",
		     rule.support, rule.confidence, rule.lift, p = self.precision )
	} else {
	    format!( "{antecedents} => {consequents}" )
	}
    }
}

impl Default for RuleFormatter {
    fn default() -> Self {
	RuleFormatter::new()
    }
}

fn join_lines( mut accumulator: String, addition: String ) -> String {
    accumulator.push_str( addition.as_str() );
    accumulator.push( '\n' );
    accumulator
}

#[cfg(test)]
mod test {
    use super::*;

    fn rule() -> Rule {
	Rule {
	    antecedents: vec!( "bread".to_string(), "butter".to_string() ),
	    consequents: vec!( "milk".to_string() ),
	    support: 0.25,
	    confidence: 2.0 / 3.0,
	    lift: 1.5,
	}
    }

    #[test]
    fn test_plain_format() {
	let formatter = RuleFormatter::new();
	let rules = vec!( rule() );
	assert_eq!( formatter.format_pretty( rules.as_slice() ), "\n{bread, butter} => {milk}\n" );
    }

    #[test]
    fn test_metrics_format() {
	let mut formatter = RuleFormatter::new();
	formatter.show_metrics();
	formatter.set_precision( 2 );
	let rules = vec!( rule() );
	assert_eq!( formatter.format_pretty( rules.as_slice() ),
		    "\n{bread, butter} => {milk}  support 0.25  confidence 0.67  lift 1.50\n" );
    }
}
