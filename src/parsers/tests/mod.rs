mod state_parser_tests;
